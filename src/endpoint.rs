//! Endpoint address validation.
//!
//! Candidate strings come straight out of the kernel's listening-socket table,
//! so most of them are not usable endpoints (`*:9001`, `[::]:80`, header
//! junk). Validation is a filter, not a failure path: a non-matching string
//! yields `None`.
//!
//! Accepted form: `[scheme://]host[:port][/path]` where `host` is either a
//! dotted DNS name or an IPv4 literal. The optional path suffix is accepted
//! and discarded.

/// Schemes a candidate address may carry explicitly.
const SCHEMES: [&str; 5] = ["http", "https", "ftp", "ftps", "tcp"];

/// Scheme assumed when the candidate carries none.
const DEFAULT_SCHEME: &str = "tcp";

/// A validated, normalized endpoint address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    pub scheme: String,
    pub host: String,
    pub port: u16,
}

/// Parses a candidate address into a normalized [`Endpoint`].
///
/// Returns `None` when the candidate is not a well-formed endpoint. The port
/// defaults to 443 for `https` and 80 for every other scheme; a missing
/// scheme normalizes to `tcp`.
pub fn parse_endpoint(candidate: &str) -> Option<Endpoint> {
    let (scheme, rest) = split_scheme(candidate)?;

    // Drop an optional path suffix; an empty host before it is malformed.
    let authority = match rest.find('/') {
        Some(idx) => &rest[..idx],
        None => rest,
    };
    if authority.is_empty() {
        return None;
    }

    let (host, port) = split_port(authority)?;
    if !is_valid_host(host) {
        return None;
    }

    let port = match port {
        Some(p) => p,
        None if scheme == "https" => 443,
        None => 80,
    };

    Some(Endpoint {
        scheme: scheme.to_string(),
        host: host.to_string(),
        port,
    })
}

/// Splits an explicit `scheme://` prefix, defaulting when absent.
/// An unknown scheme disqualifies the whole candidate.
fn split_scheme(candidate: &str) -> Option<(&str, &str)> {
    match candidate.find("://") {
        Some(idx) => {
            let scheme = &candidate[..idx];
            if SCHEMES.contains(&scheme) {
                Some((scheme, &candidate[idx + 3..]))
            } else {
                None
            }
        }
        None => Some((DEFAULT_SCHEME, candidate)),
    }
}

/// Splits `host[:port]`, parsing the port when present.
fn split_port(authority: &str) -> Option<(&str, Option<u16>)> {
    match authority.rsplit_once(':') {
        Some((host, port)) => {
            if port.is_empty() || !port.bytes().all(|b| b.is_ascii_digit()) {
                return None;
            }
            let port: u16 = port.parse().ok()?;
            Some((host, Some(port)))
        }
        None => Some((authority, None)),
    }
}

fn is_valid_host(host: &str) -> bool {
    if host.is_empty() {
        return false;
    }
    // All digits and dots: must be a well-formed IPv4 literal, not a DNS name.
    if host.bytes().all(|b| b.is_ascii_digit() || b == b'.') {
        return is_valid_ipv4(host);
    }
    is_valid_dns_name(host)
}

/// Dotted quad with every octet in 0..=255.
fn is_valid_ipv4(host: &str) -> bool {
    let octets: Vec<&str> = host.split('.').collect();
    if octets.len() != 4 {
        return false;
    }
    octets
        .iter()
        .all(|o| !o.is_empty() && o.len() <= 3 && o.parse::<u16>().is_ok_and(|v| v <= 255))
}

/// Dotted DNS name: at least two labels of `[A-Za-z0-9_-]`, with an
/// alphabetic top-level label of length >= 2.
fn is_valid_dns_name(host: &str) -> bool {
    let labels: Vec<&str> = host.split('.').collect();
    if labels.len() < 2 {
        return false;
    }
    let body_ok = labels.iter().all(|l| {
        !l.is_empty()
            && l.bytes()
                .all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-')
    });
    let tld = labels[labels.len() - 1];
    body_ok && tld.len() >= 2 && tld.bytes().all(|b| b.is_ascii_alphabetic())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ipv4_with_explicit_port() {
        let ep = parse_endpoint("http://127.0.0.1:9001").unwrap();
        assert_eq!(ep.scheme, "http");
        assert_eq!(ep.host, "127.0.0.1");
        assert_eq!(ep.port, 9001);
    }

    #[test]
    fn test_default_ports() {
        assert_eq!(parse_endpoint("https://example.com").unwrap().port, 443);
        assert_eq!(parse_endpoint("http://example.com").unwrap().port, 80);
        assert_eq!(parse_endpoint("ftp://example.com").unwrap().port, 80);
        // No scheme: generic tcp marker, port 80.
        let ep = parse_endpoint("example.com").unwrap();
        assert_eq!(ep.scheme, "tcp");
        assert_eq!(ep.port, 80);
    }

    #[test]
    fn test_explicit_port_is_preserved() {
        assert_eq!(parse_endpoint("https://example.com:8443").unwrap().port, 8443);
        assert_eq!(parse_endpoint("example.com:65535").unwrap().port, 65535);
    }

    #[test]
    fn test_dns_names() {
        assert!(parse_endpoint("http://my-host.example.com").is_some());
        assert!(parse_endpoint("http://sub_domain.example.org:8080").is_some());
        // Single label: not acceptable.
        assert!(parse_endpoint("http://localhost").is_none());
        // Numeric top-level label: not acceptable.
        assert!(parse_endpoint("http://example.123").is_none());
    }

    #[test]
    fn test_malformed_ipv4_rejected() {
        assert!(parse_endpoint("http://256.0.0.1").is_none());
        assert!(parse_endpoint("http://1.2.3").is_none());
        assert!(parse_endpoint("http://1.2.3.4.5").is_none());
        assert!(parse_endpoint("http://1..2.3").is_none());
    }

    #[test]
    fn test_path_suffix_accepted() {
        let ep = parse_endpoint("http://example.com:8080/status?all=1").unwrap();
        assert_eq!(ep.host, "example.com");
        assert_eq!(ep.port, 8080);
    }

    #[test]
    fn test_rejects_unusable_socket_table_entries() {
        // Typical ss output for wildcard / IPv6 listeners.
        assert!(parse_endpoint("http://*:9001").is_none());
        assert!(parse_endpoint("http://[::]:9001").is_none());
        assert!(parse_endpoint("http://0.0.0.0:*").is_none());
        assert!(parse_endpoint("").is_none());
    }

    #[test]
    fn test_unknown_scheme_rejected() {
        assert!(parse_endpoint("gopher://example.com").is_none());
    }

    #[test]
    fn test_bad_port_rejected() {
        assert!(parse_endpoint("http://example.com:").is_none());
        assert!(parse_endpoint("http://example.com:70000").is_none());
        assert!(parse_endpoint("http://example.com:12ab").is_none());
    }
}
