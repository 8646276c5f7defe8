use crate::domain::{
    self, Book, DomainEvent, RecordKind,
    book::BookUpsert,
    commands::{SaveBook, SaveUser},
    user::{User, UserSave},
};

use super::{
    LibraryApplicationError, Result, ServiceDependencies, record, session_service::require_admin,
};

/// 書籍保存の結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BookSaved {
    Saved { book: Book, message: String },
    /// シリアル番号の書籍がない（情報メッセージ）
    NotFound { message: String },
}

/// 利用者保存の結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserSaved {
    Saved { user: User, message: String },
    /// 「既存」指定の利用者がいない（情報メッセージ）
    NotFound { message: String },
}

async fn save_book_record(deps: &ServiceDependencies, book: Book) -> Result<()> {
    deps.catalog
        .save(book)
        .await
        .map_err(LibraryApplicationError::CatalogError)
}

/// 書籍を追加する（管理者）
///
/// シリアル番号によるupsert。既存のシリアル番号なら書名・著者を更新し、
/// なければ次のIDで新規追加する。
pub async fn add_book(deps: &ServiceDependencies, cmd: SaveBook) -> Result<BookSaved> {
    let _guard = deps.write_lock.lock().await;
    require_admin(deps).await?;

    let form = domain::book::validate_book_form(
        cmd.kind.as_deref(),
        &cmd.name,
        &cmd.author,
        &cmd.serial_number,
        cmd.category.as_deref(),
    )?;

    let existing = deps
        .catalog
        .find_by_serial(&form.serial_number)
        .await
        .map_err(LibraryApplicationError::CatalogError)?;
    let next_id = deps
        .catalog
        .next_id()
        .await
        .map_err(LibraryApplicationError::CatalogError)?;

    let message = match form.kind {
        RecordKind::New => "Book added successfully.",
        RecordKind::Existing => "Book record updated / added successfully.",
    };
    let (book, event) = match domain::book::add_book(existing.as_ref(), next_id, form) {
        BookUpsert::Added(book, event) => (book, DomainEvent::BookAdded(event)),
        BookUpsert::Updated(book, event) => (book, DomainEvent::BookUpdated(event)),
    };

    save_book_record(deps, book.clone()).await?;
    record(deps, event).await?;

    tracing::info!(book_id = %book.id, serial = %book.serial_number, "book saved");

    Ok(BookSaved::Saved {
        book,
        message: message.to_string(),
    })
}

/// 書籍情報を更新する（管理者）
///
/// シリアル番号の書籍の書名・著者を置き換える。見つからなければ情報メッセージのみ。
pub async fn update_book(deps: &ServiceDependencies, cmd: SaveBook) -> Result<BookSaved> {
    let _guard = deps.write_lock.lock().await;
    require_admin(deps).await?;

    let form = domain::book::validate_book_form(
        cmd.kind.as_deref(),
        &cmd.name,
        &cmd.author,
        &cmd.serial_number,
        None,
    )?;

    let Some(existing) = deps
        .catalog
        .find_by_serial(&form.serial_number)
        .await
        .map_err(LibraryApplicationError::CatalogError)?
    else {
        return Ok(BookSaved::NotFound {
            message: "Book not found.".to_string(),
        });
    };

    let (book, event) = domain::book::update_book(&existing, form);

    save_book_record(deps, book.clone()).await?;
    record(deps, DomainEvent::BookUpdated(event)).await?;

    tracing::info!(book_id = %book.id, serial = %book.serial_number, "book updated");

    Ok(BookSaved::Saved {
        book,
        message: "Book updated successfully.".to_string(),
    })
}

/// 利用者を登録・更新する（管理者）
///
/// 名前によるupsert。新規指定で同名がいればパスワードと役割を更新する。
pub async fn save_user(deps: &ServiceDependencies, cmd: SaveUser) -> Result<UserSaved> {
    let _guard = deps.write_lock.lock().await;
    require_admin(deps).await?;

    let form = domain::user::validate_user_form(&cmd)?;

    let existing = deps
        .users
        .find_by_name(&form.name)
        .await
        .map_err(LibraryApplicationError::UserRegistryError)?;

    let (user, event, message) = match domain::user::save_user(existing.as_ref(), form) {
        UserSave::Created(user, event) => {
            (user, DomainEvent::UserCreated(event), "New user created.")
        }
        UserSave::Updated {
            user,
            event,
            requested_new,
        } => {
            let message = if requested_new {
                "User already exists. (Updated password instead.)"
            } else {
                "User updated."
            };
            (user, DomainEvent::UserUpdated(event), message)
        }
        UserSave::NotFound => {
            return Ok(UserSaved::NotFound {
                message: "User not found.".to_string(),
            });
        }
    };

    deps.users
        .save(user.clone())
        .await
        .map_err(LibraryApplicationError::UserRegistryError)?;
    record(deps, event).await?;

    tracing::info!(user = %user.name, role = %user.role, "user saved");

    Ok(UserSaved::Saved {
        user,
        message: message.to_string(),
    })
}

/// 登録済み利用者の一覧（管理者）
pub async fn list_users(deps: &ServiceDependencies) -> Result<Vec<User>> {
    require_admin(deps).await?;
    deps.users
        .list()
        .await
        .map_err(LibraryApplicationError::UserRegistryError)
}
