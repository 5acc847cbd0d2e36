//! Service commands.

use console::style;

use crate::config::Config;

/// Start the OCR service.
pub async fn cmd_serve_ocr(config: &Config, bind: Option<&str>) -> anyhow::Result<()> {
    let (host, port) = resolve_bind(bind, &config.server.host, config.server.ocr_port)?;

    println!(
        "{} Starting OCR service at http://{}:{}",
        style("→").cyan(),
        host,
        port
    );
    println!("  Press Ctrl+C to stop");

    crate::server::serve_ocr(config, &host, port).await
}

/// Start the NER service.
pub async fn cmd_serve_ner(config: &Config, bind: Option<&str>) -> anyhow::Result<()> {
    let (host, port) = resolve_bind(bind, &config.server.host, config.server.ner_port)?;

    let backend = config.ner_backend()?;
    println!(
        "{} Starting NER service at http://{}:{} (backend: {})",
        style("→").cyan(),
        host,
        port,
        backend.backend_id()
    );
    println!("  Press Ctrl+C to stop");

    crate::server::serve_ner(config, &host, port).await
}

fn resolve_bind(
    bind: Option<&str>,
    default_host: &str,
    default_port: u16,
) -> anyhow::Result<(String, u16)> {
    match bind {
        Some(bind) => parse_bind_address(bind, default_host, default_port),
        None => Ok((default_host.to_string(), default_port)),
    }
}

/// Parse a bind address that can be:
/// - Just a port: "5000" -> default_host:5000
/// - Just a host: "127.0.0.1" -> 127.0.0.1:default_port
/// - Host and port: "127.0.0.1:5000"
fn parse_bind_address(
    bind: &str,
    default_host: &str,
    default_port: u16,
) -> anyhow::Result<(String, u16)> {
    let bind = bind.trim();
    if bind.is_empty() {
        anyhow::bail!("Empty bind address");
    }

    // Try parsing as just a port number
    if let Ok(port) = bind.parse::<u16>() {
        return Ok((default_host.to_string(), port));
    }

    // Try parsing as host:port
    if let Some((host, port_str)) = bind.rsplit_once(':') {
        if let Ok(port) = port_str.parse::<u16>() {
            let host = host.trim_start_matches('[').trim_end_matches(']');
            return Ok((host.to_string(), port));
        }
    }

    // Must be just a host, use default port
    Ok((bind.to_string(), default_port))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_port_only() {
        assert_eq!(
            parse_bind_address("8080", "0.0.0.0", 5000).unwrap(),
            ("0.0.0.0".to_string(), 8080)
        );
    }

    #[test]
    fn test_parse_host_and_port() {
        assert_eq!(
            parse_bind_address("127.0.0.1:5002", "0.0.0.0", 5000).unwrap(),
            ("127.0.0.1".to_string(), 5002)
        );
        assert_eq!(
            parse_bind_address("[::1]:5000", "0.0.0.0", 1).unwrap(),
            ("::1".to_string(), 5000)
        );
    }

    #[test]
    fn test_parse_host_only() {
        assert_eq!(
            parse_bind_address("localhost", "0.0.0.0", 5002).unwrap(),
            ("localhost".to_string(), 5002)
        );
    }

    #[test]
    fn test_parse_empty() {
        assert!(parse_bind_address("  ", "0.0.0.0", 5000).is_err());
    }

    #[test]
    fn test_resolve_defaults() {
        assert_eq!(
            resolve_bind(None, "0.0.0.0", 5002).unwrap(),
            ("0.0.0.0".to_string(), 5002)
        );
    }
}
