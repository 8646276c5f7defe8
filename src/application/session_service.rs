use crate::domain::{self, DomainEvent, UserLoggedOut, commands::Login, user::Session};

use super::{LibraryApplicationError, Result, ServiceDependencies, record};

/// ログイン結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggedIn {
    pub session: Session,
    pub message: String,
}

/// ログインする
///
/// 既存のセッションは置き換えられる。
pub async fn login(deps: &ServiceDependencies, cmd: Login) -> Result<LoggedIn> {
    let _guard = deps.write_lock.lock().await;

    // 1. ドメイン層の純粋関数で検証
    let (session, event) = domain::user::login(&cmd)?;

    // 2. セッションを保存
    deps.session
        .set(session.clone())
        .await
        .map_err(LibraryApplicationError::SessionStoreError)?;

    // 3. 操作履歴に記録
    record(deps, DomainEvent::UserLoggedIn(event)).await?;

    tracing::info!(user = %session.user_name, role = %session.role, "user logged in");

    Ok(LoggedIn {
        message: session.welcome(),
        session,
    })
}

/// ログアウトする
///
/// セッションと書籍の選択をクリアする。ログインしていなければ何もしない。
pub async fn logout(deps: &ServiceDependencies) -> Result<Option<Session>> {
    let _guard = deps.write_lock.lock().await;

    let Some(session) = current_session(deps).await? else {
        return Ok(None);
    };

    deps.session
        .clear()
        .await
        .map_err(LibraryApplicationError::SessionStoreError)?;

    let desk = deps
        .loan_desk
        .load()
        .await
        .map_err(LibraryApplicationError::LoanDeskError)?;
    deps.loan_desk
        .save(domain::loan::clear_selection(&desk))
        .await
        .map_err(LibraryApplicationError::LoanDeskError)?;

    record(
        deps,
        DomainEvent::UserLoggedOut(UserLoggedOut {
            name: session.user_name.clone(),
        }),
    )
    .await?;

    tracing::info!(user = %session.user_name, "user logged out");

    Ok(Some(session))
}

/// 現在のセッション
pub async fn current_session(deps: &ServiceDependencies) -> Result<Option<Session>> {
    deps.session
        .current()
        .await
        .map_err(LibraryApplicationError::SessionStoreError)
}

/// 管理者としてログインしていることを確認する
pub(super) async fn require_admin(deps: &ServiceDependencies) -> Result<Session> {
    match current_session(deps).await? {
        Some(session) if session.role.is_admin() => Ok(session),
        _ => Err(LibraryApplicationError::AdminRequired),
    }
}
