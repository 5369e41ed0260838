//! Logging setup utilities for the Heya chat room server.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize the tracing subscriber with the specified default log level.
///
/// This function sets up logging for the Heya crates and the binary.
/// The log level can be overridden using the `RUST_LOG` environment variable.
///
/// # Arguments
///
/// * `binary_name` - The name of the binary (e.g., "heya-server")
/// * `default_log_level` - The default log level (e.g., "debug", "info", "warn", "error")
///
/// # Examples
///
/// ```no_run
/// use heya_shared::logger::setup_logger;
///
/// setup_logger("heya-server", "debug");
/// ```
pub fn setup_logger(binary_name: &str, default_log_level: &str) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter(binary_name, default_log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Build the default filter directive: every Heya crate plus the binary at `level`,
/// HTTP tracing from tower-http at the same level.
fn default_filter(binary_name: &str, level: &str) -> String {
    format!(
        "heya_server={level},heya_shared={level},{}={level},tower_http={level}",
        binary_name.replace('-', "_"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filter_includes_binary_and_crates() {
        // テスト項目: デフォルトのフィルタにバイナリ名と各クレートが含まれる
        // given (前提条件):
        let binary_name = "heya-server";

        // when (操作):
        let filter = default_filter(binary_name, "info");

        // then (期待する結果): ハイフンはアンダースコアに置換される
        assert!(filter.contains("heya_server=info"));
        assert!(filter.contains("heya_shared=info"));
        assert!(filter.contains("tower_http=info"));
        assert!(!filter.contains("heya-server"));
    }
}
