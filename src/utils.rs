use crate::peer::types::ServerConfig;
use rand::Rng;

pub fn random_id() -> String {
    hex::encode(rand::rng().random::<[u8; 8]>())
}

/// Prefixes the ICE server URL with `stun:` or `turn:` when the scheme is missing.
pub fn add_ice_url_scheme(config: &ServerConfig) -> String {
    if config.url.starts_with("turn:")
        || config.url.starts_with("turns:")
        || config.url.starts_with("stun:")
        || config.url.starts_with("stuns:")
    {
        config.url.clone()
    } else {
        let scheme = if config.r#type == "turn" {
            "turn:"
        } else {
            "stun:"
        };
        format!("{}{}", scheme, config.url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn server(kind: &str, url: &str) -> ServerConfig {
        ServerConfig {
            id: "s".into(),
            r#type: kind.into(),
            url: url.into(),
            username: None,
            credential: None,
        }
    }

    #[test]
    fn adds_scheme_by_server_type() {
        assert_eq!(
            add_ice_url_scheme(&server("stun", "stun.l.google.com:19302")),
            "stun:stun.l.google.com:19302"
        );
        assert_eq!(
            add_ice_url_scheme(&server("turn", "relay.example:3478")),
            "turn:relay.example:3478"
        );
    }

    #[test]
    fn keeps_existing_scheme() {
        assert_eq!(
            add_ice_url_scheme(&server("turn", "stun:host:3478")),
            "stun:host:3478"
        );
        assert_eq!(
            add_ice_url_scheme(&server("turn", "turns:host:5349")),
            "turns:host:5349"
        );
    }

    #[test]
    fn random_ids_are_hex_and_distinct() {
        let a = random_id();
        let b = random_id();
        assert_eq!(a.len(), 16);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(a, b);
    }
}
