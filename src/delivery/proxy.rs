//! Which proxy, if any, a delivery routes through.

use url::Url;

use super::ProxyError;

/// How outgoing requests reach the network.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ProxyPlan {
    /// Leave proxying to the HTTP client's own environment handling.
    #[default]
    Default,
    /// Tunnel HTTPS traffic through this proxy.
    Tunnel(Url),
}

impl ProxyPlan {
    /// Plans the proxy for a webhook destination.
    ///
    /// A proxy only applies to `https` destinations, and only an `http`
    /// proxy gets an explicit tunnel. Every other combination keeps the
    /// default handling.
    ///
    /// # Errors
    ///
    /// Returns [`ProxyError::InvalidUrl`] if a proxy that would apply
    /// cannot be parsed.
    pub fn for_webhook(destination: &Url, proxy: Option<&str>) -> Result<Self, ProxyError> {
        let Some(proxy) = proxy else {
            return Ok(Self::Default);
        };
        if destination.scheme() != "https" {
            return Ok(Self::Default);
        }

        let proxy = Url::parse(proxy)?;
        if proxy.scheme() == "http" {
            Ok(Self::Tunnel(proxy))
        } else {
            Ok(Self::Default)
        }
    }

    /// Plans the proxy for API method calls: any configured proxy is used.
    ///
    /// # Errors
    ///
    /// Returns [`ProxyError::InvalidUrl`] if the proxy cannot be parsed.
    pub fn for_api(proxy: Option<&str>) -> Result<Self, ProxyError> {
        proxy.map_or(Ok(Self::Default), |proxy| {
            Ok(Self::Tunnel(Url::parse(proxy)?))
        })
    }
}
