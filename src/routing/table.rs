//! Route table construction

use hyper::Method;

use super::matcher::{PathMatch, Route, RouteAction};
use crate::relay::GfRelay;

/// Path of the per-identity setup script
pub const SETUP_SCRIPT_PATH: &str = "/setup.sh/:uuid";

/// Build the service's route table
///
/// Order: root info page, relay mount, setup script.
pub fn build_routes(relay: &GfRelay) -> Vec<Route> {
    // Mount exactly where the handler expects to be mounted
    let router = relay.router();

    vec![
        Route {
            name: "info",
            match_rule: PathMatch::Exact("/".to_string()),
            methods: Some(vec![Method::GET]),
            action: RouteAction::Info,
        },
        Route {
            name: "gf-relay",
            match_rule: PathMatch::Prefix(router.prefix().to_string()),
            methods: None,
            action: RouteAction::Relay(router),
        },
        Route {
            name: "setup-script",
            match_rule: PathMatch::Template(SETUP_SCRIPT_PATH.to_string()),
            methods: Some(vec![Method::GET]),
            action: RouteAction::SetupScript,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::tests::test_config;
    use crate::routing::match_route;

    #[test]
    fn test_relay_route_uses_relay_prefix() {
        let config = test_config("127.0.0.1", 8080, "http://127.0.0.1:10080");
        let relay = GfRelay::new(config.host(), "/gf-relay/", &config.relay).unwrap();
        let routes = build_routes(&relay);

        let (route, _) = match_route("/gf-relay/shadowsocks", &routes).unwrap();
        assert_eq!(route.name, "gf-relay");
        match &route.action {
            RouteAction::Relay(router) => assert_eq!(router.prefix(), relay.prefix()),
            _ => panic!("relay mount dispatched to the wrong action"),
        }
    }

    #[test]
    fn test_table_has_no_catch_all() {
        let config = test_config("127.0.0.1", 8080, "http://127.0.0.1:10080");
        let relay = GfRelay::new(config.host(), "/gf-relay/", &config.relay).unwrap();
        let routes = build_routes(&relay);

        assert_eq!(match_route("/", &routes).unwrap().0.name, "info");
        assert_eq!(
            match_route("/setup.sh/abc", &routes).unwrap().0.name,
            "setup-script"
        );
        assert!(match_route("/favicon.ico", &routes).is_none());
        assert!(match_route("/connect-gfwrt.sh", &routes).is_none());
    }
}
