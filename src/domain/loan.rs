use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

use super::{
    Book, BookId, BookIssued, BookReturned, BookSelected, Field, Fine, FineSettled, LoanId,
    SerialNumber, ValidationErrors, Validator,
    commands::{IssueBook, ReturnBook, SettleFine},
};

/// 貸出期間の上限（日数）
pub const LOAN_WINDOW_DAYS: u64 = 15;

// ============================================================================
// 貸出カウンターの状態
// ============================================================================

/// 貸出フォームの初期値
///
/// 書籍選択時に、本日を貸出日、本日+15日を返却予定日として埋める。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueDraft {
    pub book_id: BookId,
    pub book_name: String,
    pub author: String,
    pub issue_date: NaiveDate,
    pub return_date: NaiveDate,
}

/// 貸出中の書籍
///
/// 貸出確定時の書籍・日付・シリアル番号のスナップショット。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveLoan {
    pub loan_id: LoanId,
    pub book: Book,
    pub issue_date: NaiveDate,
    pub due_date: NaiveDate,
    pub serial_number: SerialNumber,
}

/// 返却処理済み・罰金未精算の貸出
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReturnedLoan {
    #[serde(flatten)]
    pub loan: ActiveLoan,
    pub returned_on: NaiveDate,
    pub late_days: i64,
    pub pending_fine: Fine,
}

impl std::ops::Deref for ReturnedLoan {
    type Target = ActiveLoan;

    fn deref(&self) -> &Self::Target {
        &self.loan
    }
}

/// 貸出枠
///
/// 不変条件：システム全体で貸出中の書籍は高々1冊。
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum LoanSlot {
    #[default]
    Empty,
    Issued(ActiveLoan),
    Returned(ReturnedLoan),
}

/// 貸出カウンター
///
/// 検索結果から選択中の書籍と、1件だけの貸出枠を持つ。
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LoanDesk {
    pub selected: Option<Book>,
    pub slot: LoanSlot,
}

/// 貸出ワークフローの段階
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoanPhase {
    NoActiveLoan,
    BookSelected,
    Issued,
    Returned,
}

impl LoanDesk {
    pub fn phase(&self) -> LoanPhase {
        match (&self.slot, &self.selected) {
            (LoanSlot::Returned(_), _) => LoanPhase::Returned,
            (LoanSlot::Issued(_), _) => LoanPhase::Issued,
            (LoanSlot::Empty, Some(_)) => LoanPhase::BookSelected,
            (LoanSlot::Empty, None) => LoanPhase::NoActiveLoan,
        }
    }

    /// 貸出枠に入っている貸出（返却処理済みも含む）
    pub fn active_loan(&self) -> Option<&ActiveLoan> {
        match &self.slot {
            LoanSlot::Empty => None,
            LoanSlot::Issued(loan) => Some(loan),
            LoanSlot::Returned(returned) => Some(&returned.loan),
        }
    }

    /// 未精算の罰金（返却処理前は0）
    pub fn pending_fine(&self) -> Fine {
        match &self.slot {
            LoanSlot::Returned(returned) => returned.pending_fine,
            _ => Fine::zero(),
        }
    }
}

// ============================================================================
// 罰金計算
// ============================================================================

/// 純粋関数：延滞日数（返却日 − 返却期限、日単位）
pub fn late_days(due_date: NaiveDate, returned_on: NaiveDate) -> i64 {
    (returned_on - due_date).num_days()
}

/// 純粋関数：延滞罰金
///
/// 延滞日数 × 10。期限当日以前の返却は0。
pub fn compute_fine(due_date: NaiveDate, returned_on: NaiveDate) -> Fine {
    Fine::for_late_days(late_days(due_date, returned_on))
}

// ============================================================================
// 状態遷移（純粋関数）
// ============================================================================

/// 純粋関数：書籍を選択する
///
/// 貸出フォームの初期値を返す。貸出枠には影響しない。
pub fn select_book(
    desk: &LoanDesk,
    book: Book,
    today: NaiveDate,
) -> (LoanDesk, IssueDraft, BookSelected) {
    let draft = IssueDraft {
        book_id: book.id,
        book_name: book.name.clone(),
        author: book.author.clone(),
        issue_date: today,
        return_date: today.checked_add_days(Days::new(LOAN_WINDOW_DAYS)).unwrap_or(today),
    };
    let event = BookSelected {
        book_id: book.id,
        selected_on: today,
    };
    let desk = LoanDesk {
        selected: Some(book),
        slot: desk.slot.clone(),
    };
    (desk, draft, event)
}

/// 純粋関数：選択を解除する
pub fn clear_selection(desk: &LoanDesk) -> LoanDesk {
    LoanDesk {
        selected: None,
        slot: desk.slot.clone(),
    }
}

/// 純粋関数：選択中の書籍を貸し出す
///
/// ビジネスルール：
/// - 書籍が選択されていること（未選択なら他の検証は行わない）
/// - 貸出枠が空であること
/// - 書名・貸出日・返却予定日は必須
/// - 貸出日は本日以降
/// - 返却予定日は貸出日から貸出日+15日まで（両端を含む）
///
/// 検証エラーは項目ごとにまとめて返し、状態は変更しない。
pub fn issue_book(
    desk: &LoanDesk,
    cmd: &IssueBook,
) -> Result<(LoanDesk, BookIssued), ValidationErrors> {
    let Some(book) = desk.selected.as_ref() else {
        return Err(ValidationErrors::single(
            Field::IssueBook,
            "Select a book from the catalog first",
        ));
    };

    if !matches!(desk.slot, LoanSlot::Empty) {
        return Err(ValidationErrors::single(
            Field::IssueBook,
            "A book is already issued. Complete its return before issuing another.",
        ));
    }

    let mut v = Validator::new();

    v.required(Field::IssueBook, &cmd.book_name, "Book name required");

    let issue_date = v.date(Field::IssueDate, &cmd.issue_date, "Issue date required");
    if let Some(issue_date) = issue_date {
        if issue_date < cmd.today {
            v.push(Field::IssueDate, "Issue date cannot be before today");
        }
    }

    let return_date = v.date(
        Field::IssueReturnDate,
        &cmd.return_date,
        "Return date required",
    );
    if let (Some(issue_date), Some(return_date)) = (issue_date, return_date) {
        match issue_date.checked_add_days(Days::new(LOAN_WINDOW_DAYS)) {
            Some(latest) if return_date < issue_date || return_date > latest => v.push(
                Field::IssueReturnDate,
                "Return date must be between issue date and 15 days ahead",
            ),
            Some(_) => {}
            None => v.push(Field::IssueDate, "Date is out of range"),
        }
    }

    let (Some(issue_date), Some(due_date)) = (issue_date, return_date) else {
        return Err(v.into_errors());
    };
    if !v.is_empty() {
        return Err(v.into_errors());
    }

    let loan = ActiveLoan {
        loan_id: LoanId::new(),
        book: book.clone(),
        issue_date,
        due_date,
        serial_number: book.serial_number.clone(),
    };

    let event = BookIssued {
        loan_id: loan.loan_id,
        book_id: loan.book.id,
        serial_number: loan.serial_number.clone(),
        issue_date,
        due_date,
    };

    let desk = LoanDesk {
        selected: desk.selected.clone(),
        slot: LoanSlot::Issued(loan),
    };

    Ok((desk, event))
}

/// 純粋関数：貸出中の書籍を返却する
///
/// ビジネスルール：
/// - 貸出枠に貸出があること
/// - シリアル番号が貸出時のスナップショットと完全一致すること（大文字小文字を区別）
/// - 罰金 = 延滞日数 × 10（延滞なしは0）
/// - 罰金が0でも「返却済み・未精算」状態に遷移する
/// - 精算前であれば返却日を変えて再処理できる
pub fn return_book(
    desk: &LoanDesk,
    cmd: &ReturnBook,
) -> Result<(LoanDesk, BookReturned), ValidationErrors> {
    let Some(loan) = desk.active_loan() else {
        return Err(ValidationErrors::single(
            Field::ReturnBook,
            "No active loan found. Issue a book first.",
        ));
    };

    let mut v = Validator::new();

    v.required(Field::ReturnBook, &cmd.book_name, "Book name required");

    if let Some(serial) = v.required(
        Field::ReturnSerial,
        &cmd.serial_number,
        "Serial number required",
    ) {
        if serial != loan.serial_number.as_str() {
            v.push(Field::ReturnSerial, "Serial number does not match issued book");
        }
    }

    let returned_on = v.date(
        Field::ActualReturnDate,
        &cmd.actual_return_date,
        "Actual return date required",
    );

    let Some(returned_on) = returned_on else {
        return Err(v.into_errors());
    };
    if !v.is_empty() {
        return Err(v.into_errors());
    }

    let late_days = late_days(loan.due_date, returned_on);
    let pending_fine = compute_fine(loan.due_date, returned_on);

    let event = BookReturned {
        loan_id: loan.loan_id,
        book_id: loan.book.id,
        returned_on,
        late_days,
        pending_fine,
    };

    let returned = ReturnedLoan {
        loan: loan.clone(),
        returned_on,
        late_days,
        pending_fine,
    };

    let desk = LoanDesk {
        selected: desk.selected.clone(),
        slot: LoanSlot::Returned(returned),
    };

    Ok((desk, event))
}

/// 純粋関数：罰金を精算して貸出を完了する
///
/// ビジネスルール：
/// - 返却処理済みであること
/// - 罰金がある場合は支払済みの確認が必須（未確認なら状態はそのまま）
/// - 完了すると貸出枠・罰金・書籍の選択はクリアされる
pub fn settle_fine(
    desk: &LoanDesk,
    cmd: &SettleFine,
) -> Result<(LoanDesk, FineSettled), ValidationErrors> {
    let LoanSlot::Returned(returned) = &desk.slot else {
        return Err(ValidationErrors::single(
            Field::Fine,
            "No returned book awaiting fine settlement. Process the return first.",
        ));
    };

    if !returned.pending_fine.is_zero() && !cmd.paid {
        return Err(ValidationErrors::single(
            Field::Fine,
            "Pending fine exists. Please tick 'Fine Paid' to complete the transaction.",
        ));
    }

    let remarks = cmd
        .remarks
        .as_deref()
        .map(str::trim)
        .filter(|r| !r.is_empty())
        .map(str::to_string);

    let event = FineSettled {
        loan_id: returned.loan_id,
        book_id: returned.book.id,
        amount: returned.pending_fine,
        paid: cmd.paid,
        remarks,
        settled_on: cmd.settled_on,
    };

    let desk = LoanDesk {
        selected: None,
        slot: LoanSlot::Empty,
    };

    Ok((desk, event))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn sql_master() -> Book {
        crate::seed::demo_catalog()
            .into_iter()
            .find(|b| b.serial_number.as_str() == "S303")
            .unwrap()
    }

    fn issue_cmd(issue_date: &str, return_date: &str, today: &str) -> IssueBook {
        IssueBook {
            book_name: "SQL Master".to_string(),
            issue_date: issue_date.to_string(),
            return_date: return_date.to_string(),
            today: date(today),
        }
    }

    fn return_cmd(serial: &str, actual: &str) -> ReturnBook {
        ReturnBook {
            book_name: "SQL Master".to_string(),
            serial_number: serial.to_string(),
            actual_return_date: actual.to_string(),
        }
    }

    fn settle_cmd(paid: bool) -> SettleFine {
        SettleFine {
            paid,
            remarks: None,
            settled_on: date("2024-01-13"),
        }
    }

    /// 2024-01-01 貸出、2024-01-10 返却期限の貸出中状態
    fn issued_desk() -> LoanDesk {
        let (desk, _, _) = select_book(&LoanDesk::default(), sql_master(), date("2024-01-01"));
        let (desk, _) = issue_book(&desk, &issue_cmd("2024-01-01", "2024-01-10", "2024-01-01"))
            .unwrap();
        desk
    }

    // TDD: select_book() のテスト
    #[test]
    fn test_select_book_prefills_issue_form() {
        let (desk, draft, event) =
            select_book(&LoanDesk::default(), sql_master(), date("2024-03-01"));

        assert_eq!(desk.phase(), LoanPhase::BookSelected);
        assert_eq!(draft.book_name, "SQL Master");
        assert_eq!(draft.author, "C. Date");
        assert_eq!(draft.issue_date, date("2024-03-01"));
        assert_eq!(draft.return_date, date("2024-03-16"));
        assert_eq!(event.book_id, draft.book_id);
    }

    // TDD: issue_book() のテスト
    #[test]
    fn test_issue_book_without_selection_is_rejected() {
        let result = issue_book(
            &LoanDesk::default(),
            &issue_cmd("2024-01-01", "2024-01-10", "2024-01-01"),
        );
        let errors = result.unwrap_err();
        assert_eq!(errors.errors().len(), 1);
        assert_eq!(
            errors.message_for(Field::IssueBook),
            Some("Select a book from the catalog first")
        );
    }

    #[test]
    fn test_issue_book_creates_single_active_loan() {
        let desk = issued_desk();

        assert_eq!(desk.phase(), LoanPhase::Issued);
        let loan = desk.active_loan().unwrap();
        assert_eq!(loan.issue_date, date("2024-01-01"));
        assert_eq!(loan.due_date, date("2024-01-10"));
        assert_eq!(loan.serial_number.as_str(), "S303");
        assert_eq!(loan.book.name, "SQL Master");
    }

    #[test]
    fn test_issue_book_accepts_window_boundary() {
        let (desk, _, _) = select_book(&LoanDesk::default(), sql_master(), date("2024-01-01"));

        let result = issue_book(&desk, &issue_cmd("2024-01-01", "2024-01-16", "2024-01-01"));
        assert!(result.is_ok());

        let same_day = issue_book(&desk, &issue_cmd("2024-01-01", "2024-01-01", "2024-01-01"));
        assert!(same_day.is_ok());
    }

    #[test]
    fn test_issue_book_rejects_day_after_window() {
        let (desk, _, _) = select_book(&LoanDesk::default(), sql_master(), date("2024-01-01"));

        let errors = issue_book(&desk, &issue_cmd("2024-01-01", "2024-01-17", "2024-01-01"))
            .unwrap_err();
        assert_eq!(
            errors.message_for(Field::IssueReturnDate),
            Some("Return date must be between issue date and 15 days ahead")
        );
    }

    #[test]
    fn test_issue_book_rejects_return_before_issue() {
        let (desk, _, _) = select_book(&LoanDesk::default(), sql_master(), date("2024-01-01"));

        let errors = issue_book(&desk, &issue_cmd("2024-01-05", "2024-01-04", "2024-01-01"))
            .unwrap_err();
        assert!(errors.has(Field::IssueReturnDate));
    }

    #[test]
    fn test_issue_date_near_calendar_limit_is_rejected() {
        let (desk, _, _) = select_book(&LoanDesk::default(), sql_master(), date("2024-01-01"));

        // 暦の上限から15日以内の貸出日
        let issue_date = (NaiveDate::MAX - chrono::Duration::days(3)).format("%Y-%m-%d").to_string();
        let return_date = NaiveDate::MAX.format("%Y-%m-%d").to_string();

        let errors = issue_book(&desk, &issue_cmd(&issue_date, &return_date, "2024-01-01"))
            .unwrap_err();
        assert_eq!(errors.message_for(Field::IssueDate), Some("Date is out of range"));
        assert!(!errors.has(Field::IssueReturnDate));
    }

    #[test]
    fn test_issue_book_rejects_past_issue_date() {
        let (desk, _, _) = select_book(&LoanDesk::default(), sql_master(), date("2024-01-05"));

        let errors = issue_book(&desk, &issue_cmd("2024-01-04", "2024-01-10", "2024-01-05"))
            .unwrap_err();
        assert_eq!(
            errors.message_for(Field::IssueDate),
            Some("Issue date cannot be before today")
        );
        assert!(!errors.has(Field::IssueReturnDate));
    }

    #[test]
    fn test_issue_book_reports_every_missing_field() {
        let (desk, _, _) = select_book(&LoanDesk::default(), sql_master(), date("2024-01-01"));
        let cmd = IssueBook {
            book_name: "  ".to_string(),
            issue_date: String::new(),
            return_date: String::new(),
            today: date("2024-01-01"),
        };

        let errors = issue_book(&desk, &cmd).unwrap_err();
        assert_eq!(errors.message_for(Field::IssueBook), Some("Book name required"));
        assert_eq!(errors.message_for(Field::IssueDate), Some("Issue date required"));
        assert_eq!(
            errors.message_for(Field::IssueReturnDate),
            Some("Return date required")
        );
    }

    #[test]
    fn test_issue_book_fails_when_slot_is_occupied() {
        let desk = issued_desk();

        let errors = issue_book(&desk, &issue_cmd("2024-01-01", "2024-01-10", "2024-01-01"))
            .unwrap_err();
        assert!(errors.has(Field::IssueBook));
    }

    // TDD: return_book() のテスト
    #[test]
    fn test_return_book_without_loan_is_rejected() {
        let errors = return_book(&LoanDesk::default(), &return_cmd("S303", "2024-01-10"))
            .unwrap_err();
        assert_eq!(
            errors.message_for(Field::ReturnBook),
            Some("No active loan found. Issue a book first.")
        );
    }

    #[test]
    fn test_return_book_computes_fine_for_late_days() {
        let (desk, event) = return_book(&issued_desk(), &return_cmd("S303", "2024-01-13")).unwrap();

        assert_eq!(desk.phase(), LoanPhase::Returned);
        assert_eq!(desk.pending_fine().amount(), 30);
        assert_eq!(event.late_days, 3);
        assert_eq!(event.pending_fine.amount(), 30);
    }

    #[test]
    fn test_return_book_on_due_date_has_no_fine() {
        let (desk, _) = return_book(&issued_desk(), &return_cmd("S303", "2024-01-10")).unwrap();

        assert_eq!(desk.phase(), LoanPhase::Returned);
        assert!(desk.pending_fine().is_zero());
    }

    #[test]
    fn test_return_book_before_due_date_has_no_fine() {
        let (desk, event) = return_book(&issued_desk(), &return_cmd("S303", "2024-01-03")).unwrap();

        assert!(desk.pending_fine().is_zero());
        assert_eq!(event.late_days, -7);
    }

    #[test]
    fn test_return_book_serial_is_case_sensitive() {
        let errors = return_book(&issued_desk(), &return_cmd("s303", "2024-01-10")).unwrap_err();
        assert_eq!(
            errors.message_for(Field::ReturnSerial),
            Some("Serial number does not match issued book")
        );
    }

    #[test]
    fn test_return_book_requires_fields() {
        let cmd = ReturnBook {
            book_name: String::new(),
            serial_number: " ".to_string(),
            actual_return_date: String::new(),
        };
        let errors = return_book(&issued_desk(), &cmd).unwrap_err();
        assert_eq!(errors.errors().len(), 3);
        assert_eq!(
            errors.message_for(Field::ReturnSerial),
            Some("Serial number required")
        );
        assert_eq!(
            errors.message_for(Field::ActualReturnDate),
            Some("Actual return date required")
        );
    }

    #[test]
    fn test_return_book_can_be_reprocessed_before_settlement() {
        let (desk, _) = return_book(&issued_desk(), &return_cmd("S303", "2024-01-13")).unwrap();
        let (desk, _) = return_book(&desk, &return_cmd("S303", "2024-01-11")).unwrap();

        assert_eq!(desk.pending_fine().amount(), 10);
    }

    // TDD: settle_fine() のテスト
    #[test]
    fn test_settle_fine_requires_paid_acknowledgement() {
        let (desk, _) = return_book(&issued_desk(), &return_cmd("S303", "2024-01-13")).unwrap();

        let errors = settle_fine(&desk, &settle_cmd(false)).unwrap_err();
        assert!(errors.has(Field::Fine));
        // 状態は変わらない
        assert_eq!(desk.phase(), LoanPhase::Returned);
        assert_eq!(desk.pending_fine().amount(), 30);
    }

    #[test]
    fn test_settle_fine_when_paid_clears_loan() {
        let (desk, _) = return_book(&issued_desk(), &return_cmd("S303", "2024-01-13")).unwrap();

        let (desk, event) = settle_fine(&desk, &settle_cmd(true)).unwrap();
        assert!(desk.active_loan().is_none());
        assert!(desk.pending_fine().is_zero());
        assert_eq!(desk.phase(), LoanPhase::NoActiveLoan);
        assert_eq!(event.amount.amount(), 30);
        assert!(event.paid);
    }

    #[test]
    fn test_settle_without_fine_does_not_need_paid() {
        let (desk, _) = return_book(&issued_desk(), &return_cmd("S303", "2024-01-09")).unwrap();

        let (desk, _) = settle_fine(&desk, &settle_cmd(false)).unwrap();
        assert!(matches!(desk.slot, LoanSlot::Empty));
    }

    #[test]
    fn test_settle_before_return_is_rejected() {
        let errors = settle_fine(&issued_desk(), &settle_cmd(true)).unwrap_err();
        assert!(errors.has(Field::Fine));
    }

    #[test]
    fn test_compute_fine() {
        assert_eq!(compute_fine(date("2024-01-10"), date("2024-01-13")).amount(), 30);
        assert_eq!(compute_fine(date("2024-01-10"), date("2024-01-10")).amount(), 0);
        assert_eq!(compute_fine(date("2024-01-10"), date("2024-01-01")).amount(), 0);
    }
}
