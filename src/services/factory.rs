/// Factory: build `FlowInitializer` from application `Config`.
use std::sync::Arc;

use tracing::{info, warn};

use crate::config::Config;
use crate::repos::{InMemoryServiceRegistry, RegistryError};
use crate::services::access::AccessGate;
use crate::services::cookie::CookiePolicy;
use crate::services::flow::FlowInitializer;
use crate::services::service::ServiceResolver;

pub async fn build_flow_initializer(config: &Config) -> Result<Arc<FlowInitializer>, RegistryError> {
    let registry = InMemoryServiceRegistry::from_json_file(&config.service_registry_path).await?;
    info!(
        path = %config.service_registry_path.display(),
        services = registry.len(),
        "loaded service registry"
    );
    if registry.is_empty() {
        warn!(
            path = %config.service_registry_path.display(),
            "service registry is empty; every login with a service will be refused"
        );
    }

    let initializer = FlowInitializer::new(
        Arc::new(CookiePolicy::from_settings(&config.tgc_cookie)),
        Arc::new(CookiePolicy::from_settings(&config.warn_cookie)),
        ServiceResolver::default(),
        AccessGate::new(Arc::new(registry)),
    )
    .require_service(config.require_service);

    Ok(Arc::new(initializer))
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use crate::config::{AppEnv, CookieSettings};

    fn config(registry: &std::path::Path) -> Config {
        let cookie = |name: &str| CookieSettings {
            name: name.to_string(),
            path: None,
            domain: None,
        };
        Config {
            addr: "127.0.0.1:0".parse().unwrap(),
            app_env: AppEnv::Development,
            body_limit_bytes: 1024,
            request_timeout_seconds: 5,
            context_path: "/cas".to_string(),
            service_registry_path: registry.to_path_buf(),
            require_service: true,
            tgc_cookie: cookie("TGC"),
            warn_cookie: cookie("CASPRIVACY"),
        }
    }

    #[tokio::test]
    async fn empty_registry_still_builds() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"[]").unwrap();

        let flow = build_flow_initializer(&config(file.path())).await.unwrap();
        assert_eq!(flow.tgc_cookie().name(), "TGC");
        assert_eq!(flow.warn_cookie().name(), "CASPRIVACY");
    }

    #[tokio::test]
    async fn missing_registry_file_fails() {
        let err = build_flow_initializer(&config(std::path::Path::new("/nonexistent/services.json")))
            .await
            .unwrap_err();
        assert!(matches!(err, RegistryError::Io(_)));
    }
}
