//! Client address allow-list

use std::fmt;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, UdpSocket};
use std::str::FromStr;

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum IpRuleError {
    #[error("invalid address '{0}'")]
    InvalidAddress(String),

    #[error("invalid prefix length in '{0}'")]
    InvalidPrefix(String),
}

/// A single address or a CIDR block
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IpRule {
    Exact(IpAddr),
    Cidr { network: IpAddr, prefix: u8 },
}

impl IpRule {
    pub fn contains(&self, addr: IpAddr) -> bool {
        match *self {
            IpRule::Exact(ip) => ip == addr,
            IpRule::Cidr { network, prefix } => match (network, addr) {
                (IpAddr::V4(net), IpAddr::V4(ip)) => {
                    let mask = u32::MAX.checked_shl(32 - prefix as u32).unwrap_or(0);
                    u32::from(net) & mask == u32::from(ip) & mask
                }
                (IpAddr::V6(net), IpAddr::V6(ip)) => {
                    let mask = u128::MAX.checked_shl(128 - prefix as u32).unwrap_or(0);
                    u128::from(net) & mask == u128::from(ip) & mask
                }
                _ => false,
            },
        }
    }
}

impl FromStr for IpRule {
    type Err = IpRuleError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let raw = raw.trim();
        match raw.split_once('/') {
            Some((addr, prefix)) => {
                let network = addr
                    .parse::<IpAddr>()
                    .map(normalize)
                    .map_err(|_| IpRuleError::InvalidAddress(raw.to_string()))?;
                let prefix: u8 = prefix
                    .parse()
                    .map_err(|_| IpRuleError::InvalidPrefix(raw.to_string()))?;
                let max = if network.is_ipv4() { 32 } else { 128 };
                if prefix > max {
                    return Err(IpRuleError::InvalidPrefix(raw.to_string()));
                }
                Ok(IpRule::Cidr { network, prefix })
            }
            None => raw
                .parse::<IpAddr>()
                .map(|ip| IpRule::Exact(normalize(ip)))
                .map_err(|_| IpRuleError::InvalidAddress(raw.to_string())),
        }
    }
}

impl fmt::Display for IpRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IpRule::Exact(ip) => write!(f, "{}", ip),
            IpRule::Cidr { network, prefix } => write!(f, "{}/{}", network, prefix),
        }
    }
}

/// Map IPv4-mapped IPv6 addresses (`::ffff:a.b.c.d`) back to IPv4
pub fn normalize(addr: IpAddr) -> IpAddr {
    match addr {
        IpAddr::V6(v6) => match v6.to_ipv4_mapped() {
            Some(v4) => IpAddr::V4(v4),
            None => IpAddr::V6(v6),
        },
        v4 => v4,
    }
}

fn parse_rules(entries: &[String]) -> Result<Vec<IpRule>, IpRuleError> {
    entries
        .iter()
        .filter(|e| !e.trim().is_empty())
        .map(|e| e.parse::<IpRule>())
        .collect()
}

/// Set of rules a client address must match. An empty list allows everyone.
///
/// Forwarding headers are only believed from `trusted_proxies`; the client
/// address of any other request is its socket peer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IpAllowList {
    rules: Vec<IpRule>,
    trusted_proxies: Vec<IpRule>,
}

impl IpAllowList {
    /// Parse configured entries; blank entries are skipped
    pub fn parse(entries: &[String]) -> Result<Self, IpRuleError> {
        Ok(Self {
            rules: parse_rules(entries)?,
            trusted_proxies: Vec::new(),
        })
    }

    /// Peers allowed to name the client in forwarding headers
    pub fn with_trusted_proxies(mut self, entries: &[String]) -> Result<Self, IpRuleError> {
        self.trusted_proxies = parse_rules(entries)?;
        Ok(self)
    }

    pub fn is_trusted_proxy(&self, addr: IpAddr) -> bool {
        let addr = normalize(addr);
        self.trusted_proxies.iter().any(|rule| rule.contains(addr))
    }

    /// Configured entries plus loopback and the server's own addresses.
    ///
    /// Stays empty (and thus disabled) when nothing was configured.
    pub fn with_local(
        entries: &[String],
        own: impl IntoIterator<Item = IpAddr>,
    ) -> Result<Self, IpRuleError> {
        let mut list = Self::parse(entries)?;
        if list.rules.is_empty() {
            return Ok(list);
        }
        list.push(IpRule::Exact(IpAddr::V4(Ipv4Addr::LOCALHOST)));
        list.push(IpRule::Exact(IpAddr::V6(Ipv6Addr::LOCALHOST)));
        for ip in own {
            list.push(IpRule::Exact(normalize(ip)));
        }
        Ok(list)
    }

    fn push(&mut self, rule: IpRule) {
        if !self.rules.contains(&rule) {
            self.rules.push(rule);
        }
    }

    pub fn is_enabled(&self) -> bool {
        !self.rules.is_empty()
    }

    pub fn allows(&self, addr: IpAddr) -> bool {
        if self.rules.is_empty() {
            return true;
        }
        let addr = normalize(addr);
        self.rules.iter().any(|rule| rule.contains(addr))
    }

    pub fn rules(&self) -> &[IpRule] {
        &self.rules
    }
}

/// Best-effort detection of the outbound interface address.
///
/// Connecting a UDP socket sends no packets; it only asks the OS which local
/// address would be used for the route.
pub fn local_address() -> Option<IpAddr> {
    let socket = UdpSocket::bind("0.0.0.0:0").ok()?;
    socket.connect("8.8.8.8:80").ok()?;
    socket.local_addr().ok().map(|a| a.ip())
}
