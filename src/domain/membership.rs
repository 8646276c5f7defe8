use chrono::{Months, NaiveDate};
use serde::{Deserialize, Serialize};

use super::{
    Field, MembershipAction, MembershipCancelled, MembershipCreated, MembershipDuration,
    MembershipExtended, MembershipNumber, ValidationErrors, Validator,
    commands::{CreateMembership, UpdateMembership},
};

/// 会員
///
/// 不変条件：終了日は開始日から月単位でずらした日付（取消時は取消日）。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Membership {
    pub number: MembershipNumber,
    pub member_name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl Membership {
    /// 指定日に有効か（終了日当日は無効）
    pub fn is_active_on(&self, date: NaiveDate) -> bool {
        self.start_date <= date && date < self.end_date
    }
}

/// 月単位の加算
///
/// 月末をまたぐ場合は対象月の末日に丸める（1/31 + 1か月 = 2/29 など）。
/// 暦の範囲を超える場合は`field`のエラーとする。
pub fn add_months(
    date: NaiveDate,
    months: u32,
    field: Field,
) -> Result<NaiveDate, ValidationErrors> {
    date.checked_add_months(Months::new(months))
        .ok_or_else(|| ValidationErrors::single(field, "Date is out of range"))
}

/// 会員登録フォームの検証結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMembership {
    pub member_name: String,
    pub start_date: NaiveDate,
    pub duration: MembershipDuration,
}

/// 会員登録フォームの検証
///
/// 氏名・開始日・期間（6か月／12か月）はすべて必須。
pub fn validate_new_membership(cmd: &CreateMembership) -> Result<NewMembership, ValidationErrors> {
    let mut v = Validator::new();

    let member_name = v.required(Field::MemberName, &cmd.member_name, "Member name required");
    let start_date = v.date(Field::MemberStartDate, &cmd.start_date, "Start date required");
    let duration = v.choice::<MembershipDuration>(
        Field::MemberDuration,
        cmd.duration.as_deref(),
        "Select duration",
        "Duration must be 6 or 12 months",
    );

    match (member_name, start_date, duration) {
        (Some(member_name), Some(start_date), Some(duration)) if v.is_empty() => {
            Ok(NewMembership {
                member_name: member_name.to_string(),
                start_date,
                duration,
            })
        }
        _ => Err(v.into_errors()),
    }
}

/// 純粋関数：会員を登録する
///
/// ビジネスルール：
/// - 終了日 = 開始日 + 期間（月）
/// - 会員番号は呼び出し側で採番する
pub fn create_membership(
    number: MembershipNumber,
    form: NewMembership,
) -> Result<(Membership, MembershipCreated), ValidationErrors> {
    let end_date = add_months(form.start_date, form.duration.months(), Field::MemberStartDate)?;

    let membership = Membership {
        number,
        member_name: form.member_name,
        start_date: form.start_date,
        end_date,
    };

    let event = MembershipCreated {
        membership_number: membership.number.clone(),
        member_name: membership.member_name.clone(),
        start_date: membership.start_date,
        end_date,
    };

    Ok((membership, event))
}

/// 会員更新フォームの検証結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MembershipUpdateRequest {
    pub number: MembershipNumber,
    pub action: MembershipAction,
}

/// 会員更新フォームの検証
pub fn validate_membership_update(
    cmd: &UpdateMembership,
) -> Result<MembershipUpdateRequest, ValidationErrors> {
    let mut v = Validator::new();

    let number = MembershipNumber::parse(&cmd.membership_number);
    if number.is_none() {
        v.push(Field::MembershipNumber, "Membership number required");
    }
    let action = v.choice::<MembershipAction>(
        Field::MembershipAction,
        cmd.action.as_deref(),
        "Select action",
        "Action must be cancel, extend6 or extend12",
    );

    match (number, action) {
        (Some(number), Some(action)) if v.is_empty() => {
            Ok(MembershipUpdateRequest { number, action })
        }
        _ => Err(v.into_errors()),
    }
}

/// 会員更新で発生したイベント
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MembershipChange {
    Cancelled(MembershipCancelled),
    Extended(MembershipExtended),
}

/// 純粋関数：会員資格を取消・延長する
///
/// ビジネスルール：
/// - 取消：終了日を本日にする
/// - 延長：本日ではなく現在の終了日から月数を加算する（延長は累積する）
pub fn update_membership(
    membership: &Membership,
    action: MembershipAction,
    today: NaiveDate,
) -> Result<(Membership, MembershipChange), ValidationErrors> {
    let old_end_date = membership.end_date;

    match action.extension_months() {
        None => {
            let updated = Membership {
                end_date: today,
                ..membership.clone()
            };
            let event = MembershipCancelled {
                membership_number: membership.number.clone(),
                old_end_date,
                new_end_date: today,
            };
            Ok((updated, MembershipChange::Cancelled(event)))
        }
        Some(months) => {
            let new_end_date = add_months(old_end_date, months, Field::MembershipAction)?;
            let updated = Membership {
                end_date: new_end_date,
                ..membership.clone()
            };
            let event = MembershipExtended {
                membership_number: membership.number.clone(),
                months,
                old_end_date,
                new_end_date,
            };
            Ok((updated, MembershipChange::Extended(event)))
        }
    }
}
