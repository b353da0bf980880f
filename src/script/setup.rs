//! Setup script rendering

use super::identity::GfWrt;
use crate::config::Config;
use crate::relay::GfRelay;

/// Relay service the generated script points the device at
pub const DEFAULT_SERVICE: &str = "shadowsocks";

/// Directory the generated script writes device configuration to
const CONF_DIR: &str = "/etc/vpnet";

/// Shell script that configures a gfwrt device to use this service
pub struct SetupScript<'a> {
    gfwrt: &'a GfWrt,
    config: &'a Config,
    relay: &'a GfRelay,
}

impl<'a> SetupScript<'a> {
    pub const fn new(gfwrt: &'a GfWrt, config: &'a Config, relay: &'a GfRelay) -> Self {
        Self {
            gfwrt,
            config,
            relay,
        }
    }

    /// Render the script
    ///
    /// Pure: the same device and configuration always give the same bytes.
    pub fn generate(&self) -> String {
        let server = self.config.host();
        let uuid = self.gfwrt.uuid();
        let relay_url = self.relay.url(DEFAULT_SERVICE);

        format!(
            r#"#!/bin/sh
#
# VPNet setup script for gfwrt {uuid}
# Generated by http://{server}/setup.sh/{uuid}
#
set -e

VPNET_SERVER='{server}'
VPNET_UUID='{uuid}'
VPNET_RELAY='{relay_url}'
VPNET_CONF_DIR='{CONF_DIR}'

echo "[VPNet] Configuring gfwrt ${{VPNET_UUID}}"
mkdir -p "${{VPNET_CONF_DIR}}"
cat > "${{VPNET_CONF_DIR}}/gfwrt.conf" <<EOF
server=${{VPNET_SERVER}}
uuid=${{VPNET_UUID}}
relay=${{VPNET_RELAY}}
EOF
echo "[VPNet] Relay: ${{VPNET_RELAY}}"
echo "[VPNet] Done. Configuration written to ${{VPNET_CONF_DIR}}/gfwrt.conf"
"#
        )
    }
}
