/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 imgw Project Authors
 */

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::{Arc, OnceLock};

use anyhow::anyhow;
use yaml_rust::Yaml;

const DEFAULT_LISTEN_PORT: u16 = 3080;
const DEFAULT_MAX_HEADER_SIZE: usize = 8192;
const DEFAULT_MAX_BODY_SIZE: usize = 16 << 20;

static FRONTEND_CONFIG_LOCK: OnceLock<Arc<FrontendConfig>> = OnceLock::new();

pub(crate) fn get_config() -> Arc<FrontendConfig> {
    FRONTEND_CONFIG_LOCK.get().cloned().unwrap_or_default()
}

pub(crate) struct FrontendConfig {
    pub(crate) listen_addr: SocketAddr,
    pub(crate) max_header_size: usize,
    pub(crate) max_body_size: usize,
}

impl Default for FrontendConfig {
    fn default() -> Self {
        FrontendConfig {
            listen_addr: SocketAddr::new(
                IpAddr::V4(Ipv4Addr::UNSPECIFIED),
                DEFAULT_LISTEN_PORT,
            ),
            max_header_size: DEFAULT_MAX_HEADER_SIZE,
            max_body_size: DEFAULT_MAX_BODY_SIZE,
        }
    }
}

impl FrontendConfig {
    fn parse(map: &yaml_rust::yaml::Hash) -> anyhow::Result<Self> {
        let mut config = FrontendConfig::default();

        super::foreach_kv(map, |k, v| match super::normalize_key(k).as_str() {
            "listen" | "listen_addr" => {
                config.listen_addr = super::as_sockaddr(v)?;
                Ok(())
            }
            "max_header_size" => {
                config.max_header_size = super::as_usize(v)?;
                Ok(())
            }
            "max_body_size" => {
                config.max_body_size = super::as_usize(v)?;
                Ok(())
            }
            _ => Err(anyhow!("invalid key {k}")),
        })?;

        Ok(config)
    }
}

pub(super) fn load_config(value: &Yaml) -> anyhow::Result<()> {
    if let Yaml::Hash(map) = value {
        let config = FrontendConfig::parse(map)?;
        FRONTEND_CONFIG_LOCK
            .set(Arc::new(config))
            .map_err(|_| anyhow!("duplicate frontend config"))?;
        Ok(())
    } else {
        Err(anyhow!(
            "yaml value type for the frontend config should be 'map'"
        ))
    }
}
