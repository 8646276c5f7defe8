use crate::domain::{
    self, Book, DomainEvent, Fine, FineSettled,
    commands::*,
    loan::{ActiveLoan, IssueDraft, LoanDesk, LoanPhase, LoanSlot, ReturnedLoan},
};
use serde::Serialize;

use super::{LibraryApplicationError, Result, ServiceDependencies, record};

/// 書籍選択の結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    /// 選択した。貸出フォームの初期値を返す
    Selected(IssueDraft),
    /// 指定IDの書籍がない（選択は解除される）
    NotFound { message: String },
}

/// 貸出の結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Issued {
    pub loan: ActiveLoan,
    pub message: String,
}

/// 返却処理の結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Returned {
    pub loan: ReturnedLoan,
    pub message: String,
}

/// 精算の結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settled {
    pub settlement: FineSettled,
    pub message: String,
}

/// 貸出カウンターの現況
///
/// 返却フォームの初期値（書名・著者・シリアル番号・貸出日）もここから得る。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeskStatus {
    pub phase: LoanPhase,
    pub selected: Option<Book>,
    pub active_loan: Option<ActiveLoan>,
    pub returned_on: Option<chrono::NaiveDate>,
    pub pending_fine: Fine,
}

impl From<&LoanDesk> for DeskStatus {
    fn from(desk: &LoanDesk) -> Self {
        let returned_on = match &desk.slot {
            LoanSlot::Returned(returned) => Some(returned.returned_on),
            _ => None,
        };
        Self {
            phase: desk.phase(),
            selected: desk.selected.clone(),
            active_loan: desk.active_loan().cloned(),
            returned_on,
            pending_fine: desk.pending_fine(),
        }
    }
}

/// 貸出カウンターの状態を読み込むヘルパー関数
async fn load_desk(deps: &ServiceDependencies) -> Result<LoanDesk> {
    deps.loan_desk
        .load()
        .await
        .map_err(LibraryApplicationError::LoanDeskError)
}

/// 貸出カウンターの状態を保存するヘルパー関数
async fn save_desk(deps: &ServiceDependencies, desk: LoanDesk) -> Result<()> {
    deps.loan_desk
        .save(desk)
        .await
        .map_err(LibraryApplicationError::LoanDeskError)
}

/// 検索結果から書籍を選択する
///
/// 見つからない場合はエラーではなく`Selection::NotFound`を返し、選択を解除する。
pub async fn select_book(deps: &ServiceDependencies, cmd: SelectBook) -> Result<Selection> {
    let _guard = deps.write_lock.lock().await;

    // 1. カタログから書籍を取得
    let book = deps
        .catalog
        .get(cmd.book_id)
        .await
        .map_err(LibraryApplicationError::CatalogError)?;

    let desk = load_desk(deps).await?;

    let Some(book) = book else {
        save_desk(deps, domain::loan::clear_selection(&desk)).await?;
        return Ok(Selection::NotFound {
            message: "Book not found.".to_string(),
        });
    };

    // 2. ドメイン層の純粋関数を呼び出し
    let (desk, draft, event) = domain::loan::select_book(&desk, book, cmd.today);

    // 3. 状態を保存し、履歴に記録
    save_desk(deps, desk).await?;
    record(deps, DomainEvent::BookSelected(event)).await?;

    tracing::info!(book_id = %draft.book_id, "book selected");

    Ok(Selection::Selected(draft))
}

/// 選択中の書籍を貸し出す
///
/// ビジネスルール：
/// - 書籍が選択されていること
/// - 貸出枠が空いていること（貸出中の書籍は高々1冊）
/// - 貸出日は本日以降、返却予定日は貸出日から15日以内
///
/// 検証エラー時は状態を変更しない。
pub async fn issue_book(deps: &ServiceDependencies, cmd: IssueBook) -> Result<Issued> {
    let _guard = deps.write_lock.lock().await;

    let desk = load_desk(deps).await?;

    let (desk, event) = domain::loan::issue_book(&desk, &cmd)?;
    let loan = desk
        .active_loan()
        .cloned()
        .ok_or_else(|| LibraryApplicationError::LoanDeskError("issued loan missing".into()))?;

    save_desk(deps, desk).await?;
    record(deps, DomainEvent::BookIssued(event)).await?;

    tracing::info!(
        loan_id = %loan.loan_id.value(),
        serial = %loan.serial_number,
        due_date = %loan.due_date,
        "book issued"
    );

    Ok(Issued {
        loan,
        message: "Book issued successfully.".to_string(),
    })
}

/// 貸出中の書籍を返却する
///
/// 罰金を計算して「返却済み・未精算」に遷移する。罰金が0でも精算は必要。
pub async fn return_book(deps: &ServiceDependencies, cmd: ReturnBook) -> Result<Returned> {
    let _guard = deps.write_lock.lock().await;

    let desk = load_desk(deps).await?;

    let (desk, event) = domain::loan::return_book(&desk, &cmd)?;
    let LoanSlot::Returned(returned) = &desk.slot else {
        return Err(LibraryApplicationError::LoanDeskError(
            "returned loan missing".into(),
        ));
    };
    let returned = returned.clone();

    save_desk(deps, desk).await?;
    record(deps, DomainEvent::BookReturned(event)).await?;

    tracing::info!(
        loan_id = %returned.loan_id.value(),
        late_days = returned.late_days,
        fine = returned.pending_fine.amount(),
        "book returned"
    );

    Ok(Returned {
        loan: returned,
        message: "Return processed. Settle the fine to complete the transaction.".to_string(),
    })
}

/// 罰金を精算して返却を完了する
///
/// 罰金がある場合は支払済みの確認が必要。完了すると貸出枠は空になる。
pub async fn settle_fine(deps: &ServiceDependencies, cmd: SettleFine) -> Result<Settled> {
    let _guard = deps.write_lock.lock().await;

    let desk = load_desk(deps).await?;

    let (desk, event) = domain::loan::settle_fine(&desk, &cmd)?;

    save_desk(deps, desk).await?;
    record(deps, DomainEvent::FineSettled(event.clone())).await?;

    tracing::info!(
        loan_id = %event.loan_id.value(),
        amount = event.amount.amount(),
        "fine settled"
    );

    Ok(Settled {
        settlement: event,
        message: "Return book transaction completed successfully.".to_string(),
    })
}

/// 貸出カウンターの現況
pub async fn desk_status(deps: &ServiceDependencies) -> Result<DeskStatus> {
    let desk = load_desk(deps).await?;
    Ok(DeskStatus::from(&desk))
}
