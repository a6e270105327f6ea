use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// 애플리케이션 설정이다. 실행 파일 옆 `whiteboard.yaml`에서 읽으며,
/// 파일이 없으면 기본값으로 동작한다.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// 실행/프로젝트 API의 베이스 URL.
    pub backend_base_url: String,
    /// 프로젝트 범위를 정하는 사용자 ID. 인증 협력자가 공급한다.
    pub user_id: String,
    /// 창 제목 재정의.
    pub window_title: Option<String>,
    /// 백엔드 없이 동작할지 여부. 켜면 오프라인 백엔드를 쓴다.
    pub offline: bool,
}

impl Default for AppConfig {
    /// 로컬 개발 백엔드를 가리키는 기본 설정이다.
    fn default() -> Self {
        Self {
            backend_base_url: "http://localhost:8000/api".into(),
            user_id: "local".into(),
            window_title: None,
            offline: false,
        }
    }
}

/// 주어진 경로의 YAML 설정을 파싱한다.
pub fn load_config_from_file(path: &Path) -> anyhow::Result<AppConfig> {
    let mut file =
        File::open(path).with_context(|| format!("설정 파일 열기 실패: {}", path.display()))?;
    let mut raw = String::new();
    file.read_to_string(&mut raw)
        .with_context(|| format!("설정 파일 읽기 실패: {}", path.display()))?;
    serde_yaml::from_str(&raw).with_context(|| format!("설정 파싱 실패: {}", path.display()))
}

/// 설정 파일이 있으면 읽고, 없거나 깨졌으면 기본값으로 돌아간다.
pub fn load_or_default(path: &Path) -> AppConfig {
    if !path.exists() {
        tracing::info!(path = %path.display(), "설정 파일이 없어 기본값을 사용합니다.");
        return AppConfig::default();
    }
    match load_config_from_file(path) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!(%err, "설정을 읽지 못해 기본값을 사용합니다.");
            AppConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// YAML의 일부 키만 있어도 나머지는 기본값으로 채워지는지 확인한다.
    #[test]
    fn partial_yaml_fills_defaults() {
        let config: AppConfig =
            serde_yaml::from_str("backend_base_url: https://api.example.com/v1\n").unwrap();
        assert_eq!(config.backend_base_url, "https://api.example.com/v1");
        assert_eq!(config.user_id, "local");
        assert!(!config.offline);
    }
}
