/*
 * Responsibility
 * - 登録済みサービス (RegisteredService) の参照
 * - access strategy (enabled / ssoEnabled) の判定
 * - registry の永続化は持たない (JSON から読み込むだけ)
 */
use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use regex::Regex;
use serde::Deserialize;

use crate::repos::error::{RegistryError, RepoResult};
use crate::services::service::Service;

/// Why a registered service may not take part in SSO.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenyReason {
    Disabled,
    SsoDisabled,
    // Registry-specific policy said no.
    Policy,
}

impl std::fmt::Display for DenyReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DenyReason::Disabled => write!(f, "service is disabled"),
            DenyReason::SsoDisabled => write!(f, "service is not allowed to use SSO"),
            DenyReason::Policy => write!(f, "service access denied by registry policy"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessStrategy {
    #[serde(default = "enabled_by_default")]
    pub enabled: bool,
    #[serde(default = "enabled_by_default")]
    pub sso_enabled: bool,
}

fn enabled_by_default() -> bool {
    true
}

impl Default for AccessStrategy {
    fn default() -> Self {
        Self {
            enabled: true,
            sso_enabled: true,
        }
    }
}

impl AccessStrategy {
    pub fn denial_reason(&self) -> Option<DenyReason> {
        if !self.enabled {
            Some(DenyReason::Disabled)
        } else if !self.sso_enabled {
            Some(DenyReason::SsoDisabled)
        } else {
            None
        }
    }
}

/// One entry of the registry file.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisteredServiceDef {
    pub id: i64,
    pub name: String,
    pub service_id: String,
    #[serde(default)]
    pub evaluation_order: i32,
    #[serde(default)]
    pub access_strategy: AccessStrategy,
}

/// Authoritative record for a service. `id` is internal; `service_id` is the
/// pattern matched against the externally visible service id.
#[derive(Debug, Clone)]
pub struct RegisteredService {
    pub id: i64,
    pub name: String,
    pub service_id: String,
    pub evaluation_order: i32,
    pub access_strategy: AccessStrategy,
    matcher: Regex,
}

impl RegisteredService {
    pub fn compile(def: RegisteredServiceDef) -> RepoResult<Self> {
        // full match, not substring
        let matcher = Regex::new(&format!("^(?:{})$", def.service_id)).map_err(|source| {
            RegistryError::InvalidPattern {
                id: def.id,
                source,
            }
        })?;

        Ok(Self {
            id: def.id,
            name: def.name,
            service_id: def.service_id,
            evaluation_order: def.evaluation_order,
            access_strategy: def.access_strategy,
            matcher,
        })
    }

    pub fn matches(&self, service: &Service) -> bool {
        self.matcher.is_match(service.id())
    }
}

/// Lookup surface of the service registry.
///
/// Implementations must be cheap to share (`Arc<dyn ServiceRegistry>`).
#[async_trait]
pub trait ServiceRegistry: Send + Sync + 'static {
    async fn find_service_by(&self, service: &Service) -> Option<Arc<RegisteredService>>;

    fn is_access_allowed(&self, _service: &Service, registered: &RegisteredService) -> bool {
        registered.access_strategy.denial_reason().is_none()
    }
}

/// Registry held in memory, sorted by evaluation order.
#[derive(Debug, Default)]
pub struct InMemoryServiceRegistry {
    services: Vec<Arc<RegisteredService>>,
}

impl InMemoryServiceRegistry {
    pub fn from_definitions(defs: Vec<RegisteredServiceDef>) -> RepoResult<Self> {
        let mut seen = HashSet::new();
        let mut services = Vec::with_capacity(defs.len());

        for def in defs {
            if !seen.insert(def.id) {
                return Err(RegistryError::DuplicateId(def.id));
            }
            services.push(Arc::new(RegisteredService::compile(def)?));
        }
        services.sort_by_key(|s| (s.evaluation_order, s.id));

        Ok(Self { services })
    }

    pub fn from_json_str(json: &str) -> RepoResult<Self> {
        let defs: Vec<RegisteredServiceDef> = serde_json::from_str(json)?;
        Self::from_definitions(defs)
    }

    pub async fn from_json_file(path: impl AsRef<Path>) -> RepoResult<Self> {
        let json = tokio::fs::read_to_string(path).await?;
        Self::from_json_str(&json)
    }

    pub fn len(&self) -> usize {
        self.services.len()
    }

    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }
}

#[async_trait]
impl ServiceRegistry for InMemoryServiceRegistry {
    async fn find_service_by(&self, service: &Service) -> Option<Arc<RegisteredService>> {
        self.services.iter().find(|s| s.matches(service)).cloned()
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use crate::services::service::ServiceFormat;

    const REGISTRY: &str = r#"[
        { "id": 2, "name": "catch-all", "serviceId": "https://.*", "evaluationOrder": 100 },
        { "id": 1, "name": "app", "serviceId": "https://app\\.example\\.org(/.*)?", "evaluationOrder": 1 },
        { "id": 3, "name": "legacy", "serviceId": "http://legacy\\.example\\.org/.*",
          "accessStrategy": { "enabled": false } }
    ]"#;

    fn cas(id: &str) -> Service {
        Service::from_url(id, ServiceFormat::Cas).unwrap()
    }

    #[tokio::test]
    async fn lookup_follows_evaluation_order() {
        let registry = InMemoryServiceRegistry::from_json_str(REGISTRY).unwrap();
        assert_eq!(registry.len(), 3);

        let found = registry
            .find_service_by(&cas("https://app.example.org/home"))
            .await
            .unwrap();
        assert_eq!(found.id, 1);

        let found = registry
            .find_service_by(&cas("https://other.example.org"))
            .await
            .unwrap();
        assert_eq!(found.id, 2);
    }

    #[tokio::test]
    async fn pattern_must_match_whole_id() {
        let registry = InMemoryServiceRegistry::from_json_str(
            r#"[{ "id": 1, "name": "app", "serviceId": "https://app\\.example\\.org" }]"#,
        )
        .unwrap();

        assert!(registry.find_service_by(&cas("https://app.example.org")).await.is_some());
        assert!(
            registry
                .find_service_by(&cas("https://app.example.org.evil.example"))
                .await
                .is_none()
        );
    }

    #[tokio::test]
    async fn access_strategy_defaults_and_overrides() {
        let registry = InMemoryServiceRegistry::from_json_str(REGISTRY).unwrap();

        let app_service = cas("https://app.example.org");
        let app = registry.find_service_by(&app_service).await.unwrap();
        assert!(registry.is_access_allowed(&app_service, &app));

        let legacy_service = cas("http://legacy.example.org/x");
        let legacy = registry.find_service_by(&legacy_service).await.unwrap();
        assert!(!registry.is_access_allowed(&legacy_service, &legacy));
        assert_eq!(
            legacy.access_strategy.denial_reason(),
            Some(DenyReason::Disabled)
        );
    }

    #[test]
    fn invalid_pattern_fails_loading() {
        let err = InMemoryServiceRegistry::from_json_str(
            r#"[{ "id": 9, "name": "broken", "serviceId": "https://(" }]"#,
        )
        .unwrap_err();
        assert!(matches!(err, RegistryError::InvalidPattern { id: 9, .. }));
    }

    #[test]
    fn duplicate_id_fails_loading() {
        let err = InMemoryServiceRegistry::from_json_str(
            r#"[{ "id": 1, "name": "a", "serviceId": "a" }, { "id": 1, "name": "b", "serviceId": "b" }]"#,
        )
        .unwrap_err();
        assert!(matches!(err, RegistryError::DuplicateId(1)));
    }

    #[tokio::test]
    async fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(REGISTRY.as_bytes()).unwrap();

        let registry = InMemoryServiceRegistry::from_json_file(file.path())
            .await
            .unwrap();
        assert_eq!(registry.len(), 3);

        let missing = InMemoryServiceRegistry::from_json_file("/nonexistent/services.json").await;
        assert!(matches!(missing, Err(RegistryError::Io(_))));
    }

    #[tokio::test]
    async fn empty_registry_matches_nothing() {
        let registry = InMemoryServiceRegistry::from_json_str("[]").unwrap();
        assert!(registry.is_empty());
        assert!(registry.find_service_by(&cas("https://app.example.org")).await.is_none());

        let registry = InMemoryServiceRegistry::from_json_str(REGISTRY).unwrap();
        assert!(!registry.is_empty());
    }
}
