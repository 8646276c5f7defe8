use chrono::NaiveDate;
use serde::Serialize;

use crate::domain::{
    self, DomainEvent, MembershipNumber,
    commands::{CreateMembership, UpdateMembership},
    membership::{Membership, MembershipChange},
};

use super::{LibraryApplicationError, Result, ServiceDependencies, record};

/// 会員番号採番の試行回数
const MAX_NUMBER_ATTEMPTS: usize = 32;

/// 会員登録の結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MembershipRegistered {
    pub membership: Membership,
    pub message: String,
}

/// 会員更新の結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MembershipUpdate {
    Updated {
        membership: Membership,
        message: String,
    },
    /// 会員番号が見つからない（情報メッセージ）
    NotFound { message: String },
}

/// 会員情報の照会結果
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MembershipView {
    #[serde(flatten)]
    pub membership: Membership,
    pub active: bool,
}

/// 未使用の会員番号を採番する
async fn allocate_number(deps: &ServiceDependencies) -> Result<MembershipNumber> {
    for _ in 0..MAX_NUMBER_ATTEMPTS {
        let candidate = MembershipNumber::generate(&mut rand::thread_rng());
        let taken = deps
            .memberships
            .contains(&candidate)
            .await
            .map_err(LibraryApplicationError::MembershipRegistryError)?;
        if !taken {
            return Ok(candidate);
        }
    }
    Err(LibraryApplicationError::MembershipNumberUnavailable)
}

/// 会員を登録する
///
/// ビジネスルール：
/// - 氏名・開始日・期間（6か月／12か月）は必須
/// - 会員番号は`MEM` + 5桁の乱数（台帳内で一意）
/// - 終了日 = 開始日 + 期間
pub async fn create_membership(
    deps: &ServiceDependencies,
    cmd: CreateMembership,
) -> Result<MembershipRegistered> {
    let _guard = deps.write_lock.lock().await;

    // 1. 入力検証（採番より先に行う）
    let form = domain::membership::validate_new_membership(&cmd)?;

    // 2. 会員番号の採番
    let number = allocate_number(deps).await?;

    // 3. ドメイン層の純粋関数を呼び出し
    let (membership, event) = domain::membership::create_membership(number, form)?;

    // 4. 保存して履歴に記録
    deps.memberships
        .save(membership.clone())
        .await
        .map_err(LibraryApplicationError::MembershipRegistryError)?;
    record(deps, DomainEvent::MembershipCreated(event)).await?;

    tracing::info!(
        number = %membership.number,
        end_date = %membership.end_date,
        "membership created"
    );

    Ok(MembershipRegistered {
        message: format!("Membership created. Number: {}", membership.number),
        membership,
    })
}

/// 会員資格を取消・延長する
///
/// ビジネスルール：
/// - 取消は終了日を本日にする
/// - 延長は現在の終了日に加算する
/// - 会員番号が見つからない場合はエラーではなく`MembershipUpdate::NotFound`
pub async fn update_membership(
    deps: &ServiceDependencies,
    cmd: UpdateMembership,
) -> Result<MembershipUpdate> {
    let _guard = deps.write_lock.lock().await;

    let request = domain::membership::validate_membership_update(&cmd)?;

    let Some(membership) = deps
        .memberships
        .get(&request.number)
        .await
        .map_err(LibraryApplicationError::MembershipRegistryError)?
    else {
        return Ok(MembershipUpdate::NotFound {
            message: "Membership not found".to_string(),
        });
    };

    let (membership, change) =
        domain::membership::update_membership(&membership, request.action, cmd.today)?;

    deps.memberships
        .save(membership.clone())
        .await
        .map_err(LibraryApplicationError::MembershipRegistryError)?;

    let (message, event) = match change {
        MembershipChange::Cancelled(e) => (
            "Membership cancelled.".to_string(),
            DomainEvent::MembershipCancelled(e),
        ),
        MembershipChange::Extended(e) => (
            format!("Membership extended till {}.", e.new_end_date),
            DomainEvent::MembershipExtended(e),
        ),
    };
    record(deps, event).await?;

    tracing::info!(
        number = %membership.number,
        end_date = %membership.end_date,
        "membership updated"
    );

    Ok(MembershipUpdate::Updated {
        membership,
        message,
    })
}

/// 会員番号で会員を照会する
pub async fn get_membership(
    deps: &ServiceDependencies,
    number: &str,
    today: NaiveDate,
) -> Result<Option<MembershipView>> {
    let Some(number) = MembershipNumber::parse(number) else {
        return Ok(None);
    };

    let membership = deps
        .memberships
        .get(&number)
        .await
        .map_err(LibraryApplicationError::MembershipRegistryError)?;

    Ok(membership.map(|membership| MembershipView {
        active: membership.is_active_on(today),
        membership,
    }))
}

/// 登録済みの全会員（本日時点の有効・無効つき）
pub async fn list_memberships(
    deps: &ServiceDependencies,
    today: NaiveDate,
) -> Result<Vec<MembershipView>> {
    let memberships = deps
        .memberships
        .list()
        .await
        .map_err(LibraryApplicationError::MembershipRegistryError)?;

    Ok(memberships
        .into_iter()
        .map(|membership| MembershipView {
            active: membership.is_active_on(today),
            membership,
        })
        .collect())
}
