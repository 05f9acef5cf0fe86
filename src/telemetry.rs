//! Tracing setup for the server.
//!
//! LOG_LEVEL overrides the filter directives; LOG_FORMAT=json switches to
//! structured JSON lines. Targets are printed so generator, validator and
//! grading logs stay distinguishable from the tower-http request spans.

use tracing_subscriber::EnvFilter;

/// Used when LOG_LEVEL is unset or does not parse.
pub const DEFAULT_DIRECTIVES: &str =
    "info,fe_practice=debug,generator=debug,validator=info,grading=debug,tower_http=info,axum=info";

pub fn init_tracing() {
    let filter = EnvFilter::try_from_env("LOG_LEVEL").unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVES));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(true)
        .with_line_number(true);

    match std::env::var("LOG_FORMAT").as_deref() {
        Ok("json") => builder.json().init(),
        _ => builder.init(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_directives_parse() {
        let filter = EnvFilter::try_new(DEFAULT_DIRECTIVES).expect("valid directives");
        assert!(filter.to_string().contains("grading=debug"));
    }
}
