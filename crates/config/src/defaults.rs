/// Default values for configuration fields

pub fn timeout_secs() -> u64 {
    30  // 0 = no timeout
}

pub fn user_agent() -> String {
    "picbed".to_string()
}

pub fn picbed_settings() -> super::models::PicbedSettings {
    super::models::PicbedSettings {
        current: String::new(),
    }
}

pub fn transport_settings() -> super::models::TransportSettings {
    super::models::TransportSettings {
        timeout_secs: timeout_secs(),
        user_agent: user_agent(),
    }
}

pub const DEFAULT_CONFIG_TEMPLATE: &str = r#"# ===============================================================================
# picbed Configuration
# ===============================================================================

[picbed]
current = ""                         # Active picture bed: "aliyun" | "internal" | "github"

[transport]
timeout_secs = 30                    # Per-request timeout in seconds (0 = none)
user_agent = "picbed"                # User-Agent sent with every upload

# ===============================================================================
# PICTURE BEDS
# ===============================================================================
# Uncomment the section of the backend you use, or run `picbed set <name> key=value`.

#[picbed.aliyun]
#accessKeyId = ""                    # AccessKey ID
#accessKeySecret = ""                # AccessKey secret
#bucket = ""                         # Bucket name
#area = ""                           # Region, e.g. oss-cn-hangzhou
#path = ""                           # Key prefix, e.g. img/
#customUrl = ""                      # Custom domain (optional)
#options = ""                        # URL suffix, e.g. ?x-oss-process=style/small

#[picbed.internal]
#url = ""                            # Base URL of the internal image server
#version = 1                         # API version
#token = ""                          # Bearer token (optional)

#[picbed.github]
#token = ""                          # Personal access token
#repo = ""                           # owner/name
#path = ""                           # Directory prefix, e.g. img/
#branch = "master"                   # Target branch
#customUrl = ""                      # Custom domain (optional)
"#;
