//! Network interface probing for the VPN tunnel device

use crate::{Error, Result};
use pnet::datalink;
use pnet::ipnetwork::IpNetwork;
use std::net::{IpAddr, Ipv4Addr};

/// Check whether the named interface is present and carries at least one
/// IPv4 address.
///
/// The interface list is queried fresh from the OS on every call; an absent
/// interface is simply "not connected", never an error.
pub fn is_connected(name: &str) -> bool {
    let connected = datalink::interfaces()
        .iter()
        .find(|iface| iface.name == name)
        .map(|iface| iface.ips.iter().any(IpNetwork::is_ipv4))
        .unwrap_or(false);

    if connected {
        log::debug!("interface `{}` is connected", name);
    }

    connected
}

/// The single IPv4 address bound to the named interface.
///
/// Exactly one VPN-assigned address is assumed. Zero addresses (including an
/// absent interface) or more than one are a host misconfiguration and fail
/// with [`Error::Interface`] rather than silently picking one.
pub fn ipv4_address(name: &str) -> Result<Ipv4Addr> {
    let interfaces = datalink::interfaces();
    let ips = interfaces
        .iter()
        .find(|iface| iface.name == name)
        .map(|iface| iface.ips.as_slice())
        .unwrap_or_default();

    select_ipv4(name, ips)
}

fn select_ipv4(name: &str, ips: &[IpNetwork]) -> Result<Ipv4Addr> {
    let v4: Vec<Ipv4Addr> = ips
        .iter()
        .filter_map(|net| match net.ip() {
            IpAddr::V4(addr) => Some(addr),
            IpAddr::V6(_) => None,
        })
        .collect();

    match v4.as_slice() {
        [addr] => Ok(*addr),
        other => Err(Error::Interface {
            name: name.to_string(),
            count: other.len(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pnet::ipnetwork::{Ipv4Network, Ipv6Network};

    fn v4(addr: [u8; 4], prefix: u8) -> IpNetwork {
        IpNetwork::V4(Ipv4Network::new(Ipv4Addr::from(addr), prefix).unwrap())
    }

    #[test]
    fn test_absent_interface_is_not_connected() {
        assert!(!is_connected("pia-forward-test-no-such-interface"));
    }

    #[test]
    fn test_absent_interface_address_lookup_fails() {
        let err = ipv4_address("pia-forward-test-no-such-interface").unwrap_err();
        assert!(matches!(err, Error::Interface { count: 0, .. }));
    }

    #[test]
    fn test_select_single_ipv4() {
        let ips = vec![v4([10, 8, 0, 2], 24)];
        let addr = select_ipv4("tun0", &ips).unwrap();
        assert_eq!(addr, Ipv4Addr::new(10, 8, 0, 2));
    }

    #[test]
    fn test_select_ignores_ipv6() {
        let ips = vec![
            IpNetwork::V6(Ipv6Network::new("fe80::1".parse().unwrap(), 64).unwrap()),
            v4([10, 8, 0, 2], 24),
        ];
        assert_eq!(
            select_ipv4("tun0", &ips).unwrap(),
            Ipv4Addr::new(10, 8, 0, 2)
        );
    }

    #[test]
    fn test_select_zero_addresses_fails() {
        let err = select_ipv4("tun0", &[]).unwrap_err();
        match err {
            Error::Interface { name, count } => {
                assert_eq!(name, "tun0");
                assert_eq!(count, 0);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_select_multiple_addresses_fails() {
        let ips = vec![v4([10, 8, 0, 2], 24), v4([10, 9, 0, 2], 24)];
        let err = select_ipv4("tun0", &ips).unwrap_err();
        assert!(matches!(err, Error::Interface { count: 2, .. }));
    }
}
