/// 二进制单位，按 1024 进位
const UNITS: [&str; 6] = ["KiB", "MiB", "GiB", "TiB", "PiB", "EiB"];

/// 把字节数格式化为易读的形式，例如 `1536` -> `1.5 KiB`
///
/// 小于 1024 时直接显示字节数，否则保留一位小数。
pub fn bytes_to_human(bytes: u64) -> String {
    if bytes < 1024 {
        return format!("{bytes} B");
    }

    let mut value = bytes as f64 / 1024.0;
    let mut unit = 0;
    // 四舍五入后会显示为 1024.0 的值进到下一个单位
    while value >= 1023.95 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    format!("{value:.1} {}", UNITS[unit])
}
