use std::sync::Once;

static TRACING_INIT: Once = Once::new();

/// Initializes the global tracing subscriber with sensible defaults.
///
/// `RUST_LOG` directives are honoured; `quote_wizard=info` is always added.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, EnvFilter};

        let mut filter = EnvFilter::from_default_env();
        if let Ok(directive) = "quote_wizard=info".parse() {
            filter = filter.add_directive(directive);
        }

        // A host application may already own the global subscriber; its
        // configuration wins.
        if let Err(err) = fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init()
        {
            tracing::debug!(error = %err, "global tracing subscriber already installed");
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn yields_to_an_existing_subscriber() {
        let _ = tracing_subscriber::fmt().with_test_writer().try_init();
        init_tracing();
        init_tracing();
    }
}
