//! 统一的环境变量管理系统
//!
//! 提供类型安全、可验证的环境变量覆盖，供配置管理器和可执行程序使用

use std::env;
use std::fmt;

/// 环境变量解析错误
#[derive(Debug, Clone)]
pub struct EnvError {
    pub variable: String,
    pub message: String,
}

impl fmt::Display for EnvError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Environment variable '{}': {}", self.variable, self.message)
    }
}

impl std::error::Error for EnvError {}

pub type EnvResult<T> = Result<T, EnvError>;

/// 环境变量访问器特性
pub trait EnvVar<T> {
    const NAME: &'static str;
    const DEFAULT: Option<T>;
    const DESCRIPTION: &'static str;

    fn parse(value: &str) -> EnvResult<T>;

    fn get() -> EnvResult<T> {
        match env::var(Self::NAME) {
            Ok(value) => Self::parse(&value),
            Err(_) => {
                if let Some(default) = Self::DEFAULT {
                    Ok(default)
                } else {
                    Err(EnvError {
                        variable: Self::NAME.to_string(),
                        message: "Required environment variable not set".to_string(),
                    })
                }
            }
        }
    }

    /// 仅在变量被设置时返回值；值无效时返回错误
    fn get_override() -> EnvResult<Option<T>> {
        match env::var(Self::NAME) {
            Ok(value) => Self::parse(&value).map(Some),
            Err(_) => Ok(None),
        }
    }
}

/// 翻译相关环境变量
pub mod translation {
    use super::*;

    /// 源语言
    pub struct SourceLang;
    impl EnvVar<String> for SourceLang {
        const NAME: &'static str = "AUTOWEB_SOURCE_LANG";
        const DEFAULT: Option<String> = None;
        const DESCRIPTION: &'static str = "Language the served pages are written in";

        fn parse(value: &str) -> EnvResult<String> {
            parse_language(value, Self::NAME)
        }
    }

    /// 配置文件路径
    pub struct ConfigPath;
    impl EnvVar<String> for ConfigPath {
        const NAME: &'static str = "AUTOWEB_CONFIG";
        const DEFAULT: Option<String> = None;
        const DESCRIPTION: &'static str = "Path of the TOML configuration file";

        fn parse(value: &str) -> EnvResult<String> {
            let path = value.trim();
            if path.is_empty() {
                return Err(EnvError {
                    variable: Self::NAME.to_string(),
                    message: "Path cannot be empty".to_string(),
                });
            }
            Ok(path.to_string())
        }
    }

    /// 缓冲区上限
    pub struct MaxBufferedBytes;
    impl EnvVar<usize> for MaxBufferedBytes {
        const NAME: &'static str = "AUTOWEB_MAX_BUFFERED_BYTES";
        const DEFAULT: Option<usize> = Some(8 * 1024 * 1024);
        const DESCRIPTION: &'static str = "Maximum bytes buffered while waiting for </html>";

        fn parse(value: &str) -> EnvResult<usize> {
            parse_positive_usize(value, Self::NAME, 1024, 1024 * 1024 * 1024)
        }
    }
}

/// Google 翻译后端环境变量
pub mod google {
    use super::*;

    /// API 密钥
    pub struct ApiKey;
    impl EnvVar<String> for ApiKey {
        const NAME: &'static str = "AUTOWEB_GOOGLE_API_KEY";
        const DEFAULT: Option<String> = None;
        const DESCRIPTION: &'static str = "API key for the Google translation endpoint";

        fn parse(value: &str) -> EnvResult<String> {
            let key = value.trim();
            if key.is_empty() {
                return Err(EnvError {
                    variable: Self::NAME.to_string(),
                    message: "API key cannot be empty".to_string(),
                });
            }
            Ok(key.to_string())
        }
    }

    /// API URL
    pub struct Endpoint;
    impl EnvVar<String> for Endpoint {
        const NAME: &'static str = "AUTOWEB_GOOGLE_ENDPOINT";
        const DEFAULT: Option<String> = None;
        const DESCRIPTION: &'static str = "Translation API endpoint URL";

        fn parse(value: &str) -> EnvResult<String> {
            let url = value.trim();
            if url.starts_with("http://") || url.starts_with("https://") {
                Ok(url.to_string())
            } else {
                Err(EnvError {
                    variable: Self::NAME.to_string(),
                    message: "API URL must start with http:// or https://".to_string(),
                })
            }
        }
    }

    /// 子批次失败时的重试次数
    pub struct MaxRetries;
    impl EnvVar<usize> for MaxRetries {
        const NAME: &'static str = "AUTOWEB_GOOGLE_MAX_RETRIES";
        const DEFAULT: Option<usize> = Some(0);
        const DESCRIPTION: &'static str = "Retries of a failed sub-batch before the pass aborts";

        fn parse(value: &str) -> EnvResult<usize> {
            parse_positive_usize(value, Self::NAME, 0, 10)
        }
    }
}

/// Web 服务器相关环境变量
pub mod web {
    use super::*;

    /// 绑定地址
    pub struct BindAddress;
    impl EnvVar<String> for BindAddress {
        const NAME: &'static str = "AUTOWEB_BIND_ADDR";
        const DEFAULT: Option<String> = None;
        const DESCRIPTION: &'static str = "Address the web server binds to";

        fn parse(value: &str) -> EnvResult<String> {
            let addr = value.trim();
            if addr.is_empty() {
                return Err(EnvError {
                    variable: Self::NAME.to_string(),
                    message: "Bind address cannot be empty".to_string(),
                });
            }
            Ok(addr.to_string())
        }
    }

    /// 端口
    pub struct Port;
    impl EnvVar<u16> for Port {
        const NAME: &'static str = "AUTOWEB_PORT";
        const DEFAULT: Option<u16> = Some(7080);
        const DESCRIPTION: &'static str = "Port the web server listens on";

        fn parse(value: &str) -> EnvResult<u16> {
            let port: u16 = value.trim().parse().map_err(|_| EnvError {
                variable: Self::NAME.to_string(),
                message: "Must be a valid port number".to_string(),
            })?;

            if port == 0 {
                return Err(EnvError {
                    variable: Self::NAME.to_string(),
                    message: "Port cannot be 0".to_string(),
                });
            }

            Ok(port)
        }
    }
}

/// 所有支持的环境变量及其说明，供帮助信息使用
pub fn documented_variables() -> Vec<(&'static str, &'static str)> {
    fn entry<T, V: EnvVar<T>>() -> (&'static str, &'static str) {
        (V::NAME, V::DESCRIPTION)
    }

    vec![
        entry::<String, translation::SourceLang>(),
        entry::<String, translation::ConfigPath>(),
        entry::<usize, translation::MaxBufferedBytes>(),
        entry::<String, google::ApiKey>(),
        entry::<String, google::Endpoint>(),
        entry::<usize, google::MaxRetries>(),
        entry::<String, web::BindAddress>(),
        entry::<u16, web::Port>(),
    ]
}

/// 加载第一个存在的 .env 文件，返回其文件名
///
/// 在初始化日志之前调用，使 `.env` 中的 `RUST_LOG` 生效。
#[cfg(any(feature = "cli", feature = "web"))]
pub fn load_dotenv() -> Option<&'static str> {
    [".env.local", ".env"].into_iter().find(|env_file| {
        std::path::Path::new(env_file).exists() && dotenv::from_filename(env_file).is_ok()
    })
}

/// 辅助函数
fn parse_language(value: &str, var_name: &str) -> EnvResult<String> {
    let lang = value.trim().to_lowercase();
    let valid = (2..=10).contains(&lang.len())
        && lang.chars().all(|c| c.is_ascii_alphanumeric() || c == '-');

    if valid {
        Ok(lang)
    } else {
        Err(EnvError {
            variable: var_name.to_string(),
            message: format!("Invalid language code '{}'", value),
        })
    }
}

fn parse_positive_usize(value: &str, var_name: &str, min: usize, max: usize) -> EnvResult<usize> {
    let num: usize = value.trim().parse().map_err(|_| EnvError {
        variable: var_name.to_string(),
        message: "Must be a valid positive number".to_string(),
    })?;

    if num < min {
        return Err(EnvError {
            variable: var_name.to_string(),
            message: format!("Value {} is below minimum {}", num, min),
        });
    }

    if num > max {
        return Err(EnvError {
            variable: var_name.to_string(),
            message: format!("Value {} exceeds maximum {}", num, max),
        });
    }

    Ok(num)
}
