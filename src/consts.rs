pub mod cli_consts {
    //! Client Configuration Constants
    //!
    //! Constants for the dashboard client, organized by functional area.

    // =============================================================================
    // API CONFIGURATION
    // =============================================================================

    /// REST endpoints exposed by the dashboard JSON server.
    pub mod endpoints {
        /// Full list of tracked tools.
        pub const TOOLS: &str = "tools";
        /// Aggregated spend and usage analytics.
        pub const ANALYTICS: &str = "analytics";
    }

    // =============================================================================
    // NETWORK CONFIGURATION
    // =============================================================================

    /// HTTP client timing configuration
    pub mod http {
        use std::time::Duration;

        /// Time allowed for establishing a connection (seconds)
        pub const CONNECT_TIMEOUT_SECS: u64 = 10;

        /// Time allowed for a complete request, body included (seconds)
        pub const REQUEST_TIMEOUT_SECS: u64 = 10;

        pub const fn connect_timeout() -> Duration {
            Duration::from_secs(CONNECT_TIMEOUT_SECS)
        }

        pub const fn request_timeout() -> Duration {
            Duration::from_secs(REQUEST_TIMEOUT_SECS)
        }
    }

    // =============================================================================
    // ROUTING CONFIGURATION
    // =============================================================================

    /// Maximum number of redirects followed while resolving a single path.
    pub const MAX_REDIRECTS: usize = 8;

    // =============================================================================
    // SETTINGS
    // =============================================================================

    /// Directory under the user's home holding client settings.
    pub const SETTINGS_DIR: &str = ".tooltrack";

    /// Settings file name inside [`SETTINGS_DIR`].
    pub const SETTINGS_FILE: &str = "settings.json";

    /// Environment variable selecting the API deployment.
    pub const ENVIRONMENT_VAR: &str = "TOOLTRACK_ENVIRONMENT";
}
