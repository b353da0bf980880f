//! Root info page

use crate::config::Config;

/// Script clients pipe into their shell to connect
pub const CONNECT_SCRIPT: &str = "connect-gfwrt.sh";

/// One-line connect command shown at `/`
pub fn connect_command(config: &Config) -> String {
    format!("curl -sL http://{}/{CONNECT_SCRIPT} | bash -", config.host())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::tests::test_config;

    #[test]
    fn test_connect_command() {
        let config = test_config("127.0.0.1", 8080, "http://127.0.0.1:10080");
        assert_eq!(
            connect_command(&config),
            "curl -sL http://127.0.0.1:8080/connect-gfwrt.sh | bash -"
        );
    }

    #[test]
    fn test_connect_command_hostname() {
        let config = test_config("vpnet.example.com", 443, "http://127.0.0.1:10080");
        assert_eq!(
            connect_command(&config),
            "curl -sL http://vpnet.example.com:443/connect-gfwrt.sh | bash -"
        );
    }
}
