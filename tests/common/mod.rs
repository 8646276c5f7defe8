#![allow(dead_code)]

use chrono::NaiveDate;
use rusty_library_desk::application::{ServiceDependencies, activity_service, session_service};
use rusty_library_desk::domain::commands::Login;
use rusty_library_desk::seed;

/// テストで「本日」として使う日付
pub fn today() -> NaiveDate {
    date("2024-01-01")
}

pub fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").expect("valid test date")
}

/// デモ用蔵書4冊を登録したインメモリの依存関係
pub fn create_test_deps() -> ServiceDependencies {
    ServiceDependencies::in_memory(seed::demo_catalog())
}

/// 指定した役割でログインする
pub async fn login_as(deps: &ServiceDependencies, name: &str, role: &str) {
    session_service::login(
        deps,
        Login {
            name: name.to_string(),
            password: "pw".to_string(),
            role: Some(role.to_string()),
        },
    )
    .await
    .expect("login should succeed");
}

/// 操作履歴のイベント種別を追加順に取得する
pub async fn event_types(deps: &ServiceDependencies) -> Vec<&'static str> {
    activity_service::activity_log(deps)
        .await
        .expect("event log readable")
        .iter()
        .map(|record| record.event.event_type())
        .collect()
}
