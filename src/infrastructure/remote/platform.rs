use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 生成与 Adoptium API 取值一一对应的封闭枚举。
///
/// 每个变体都有显式的小写线上名称，serde、clap 和 `FromStr` 共用同一份映射。
macro_rules! wire_enum {
    (
        $(#[$meta:meta])*
        $name:ident {
            $($(#[$vmeta:meta])* $variant:ident => $wire:tt),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
        pub enum $name {
            $(
                $(#[$vmeta])*
                #[serde(rename = $wire)]
                #[value(name = $wire)]
                $variant,
            )+
        }

        impl $name {
            /// 所有可选值
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// API 中使用的名称
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $wire),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let lower = s.trim().to_ascii_lowercase();
                $(
                    if lower == $wire {
                        return Ok($name::$variant);
                    }
                )+
                let expected: Vec<&str> = $name::ALL.iter().map(|v| v.as_str()).collect();
                Err(format!(
                    "无效的{}: '{}'，可选值: {}",
                    stringify!($name),
                    s,
                    expected.join(", ")
                ))
            }
        }
    };
}

wire_enum! {
    /// JVM 实现
    JvmImpl {
        Hotspot => "hotspot",
        Openj9 => "openj9",
        Dragonwell => "dragonwell",
    }
}

wire_enum! {
    /// CPU 架构
    Architecture {
        X64 => "x64",
        X86 => "x86",
        X32 => "x32",
        Ppc64 => "ppc64",
        Ppc64le => "ppc64le",
        S390x => "s390x",
        Aarch64 => "aarch64",
        Arm => "arm",
        Sparcv9 => "sparcv9",
        Riscv64 => "riscv64",
    }
}

wire_enum! {
    /// 镜像类型，jre 体积最小
    ImageType {
        Jdk => "jdk",
        Jre => "jre",
        Testimage => "testimage",
        Debugimage => "debugimage",
        Staticlibs => "staticlibs",
        Sources => "sources",
        Sbom => "sbom",
    }
}

wire_enum! {
    /// 操作系统
    OperatingSystem {
        Linux => "linux",
        Windows => "windows",
        Mac => "mac",
        Solaris => "solaris",
        Aix => "aix",
        AlpineLinux => "alpine-linux",
    }
}

wire_enum! {
    /// 发行商，目前只有 Eclipse
    Vendor {
        Eclipse => "eclipse",
    }
}

/// 发布目录查询条件，从配置构建一次后不再修改
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReleaseQuery {
    pub feature_version: u32,
    pub jvm_impl: JvmImpl,
    pub architecture: Architecture,
    pub image_type: ImageType,
    pub os: OperatingSystem,
    pub vendor: Vendor,
}

impl fmt::Display for ReleaseQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{} ({}-{}, {}, {})",
            self.feature_version, self.jvm_impl, self.os, self.architecture, self.image_type, self.vendor
        )
    }
}
