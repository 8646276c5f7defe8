use serde::{Deserialize, Serialize};

use super::{
    BookAdded, BookId, BookUpdated, Field, RecordKind, SerialNumber, ValidationErrors, Validator,
};

/// 書籍追加時にカテゴリ未指定の場合の既定値
pub const DEFAULT_CATEGORY: &str = "Programming";

/// 蔵書
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    pub id: BookId,
    pub name: String,
    pub author: String,
    pub serial_number: SerialNumber,
    pub category: String,
}

// ============================================================================
// 蔵書検索
// ============================================================================

/// 検索条件
///
/// 不変条件：書名とカテゴリの少なくとも一方が指定されている。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchCriteria {
    /// 小文字化済みの書名（部分一致）
    name: Option<String>,
    /// カテゴリ（完全一致）
    category: Option<String>,
}

impl SearchCriteria {
    /// 入力値から検索条件を作る
    pub fn parse(name: &str, category: &str) -> Result<Self, ValidationErrors> {
        let name = Some(name.trim().to_lowercase()).filter(|n| !n.is_empty());
        let category = Some(category.trim().to_string()).filter(|c| !c.is_empty());

        if name.is_none() && category.is_none() {
            return Err(ValidationErrors::single(
                Field::Search,
                "Enter book name or select category",
            ));
        }

        Ok(Self { name, category })
    }

    pub fn matches(&self, book: &Book) -> bool {
        let name_matches = self
            .name
            .as_deref()
            .is_none_or(|name| book.name.to_lowercase().contains(name));
        let category_matches = self
            .category
            .as_deref()
            .is_none_or(|category| book.category == category);
        name_matches && category_matches
    }
}

/// 検索結果
///
/// 該当なしは空の一覧ではなく明示的な`NoResults`で表す。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SearchOutcome {
    Found { books: Vec<Book> },
    NoResults { message: String },
}

/// 純粋関数：蔵書を検索する
pub fn search(books: &[Book], criteria: &SearchCriteria) -> SearchOutcome {
    let found: Vec<Book> = books
        .iter()
        .filter(|b| criteria.matches(b))
        .cloned()
        .collect();

    if found.is_empty() {
        SearchOutcome::NoResults {
            message: "No books found".to_string(),
        }
    } else {
        SearchOutcome::Found { books: found }
    }
}

// ============================================================================
// 書籍管理（管理者）
// ============================================================================

/// 検証済みの書籍フォーム
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookForm {
    pub kind: RecordKind,
    pub name: String,
    pub author: String,
    pub serial_number: SerialNumber,
    pub category: Option<String>,
}

/// 書籍フォームの検証
///
/// 種別・書名・著者・シリアル番号は必須。カテゴリは任意。
pub fn validate_book_form(
    kind: Option<&str>,
    name: &str,
    author: &str,
    serial_number: &str,
    category: Option<&str>,
) -> Result<BookForm, ValidationErrors> {
    let mut v = Validator::new();

    let kind = v.choice::<RecordKind>(
        Field::BookKind,
        kind,
        "Select new or existing",
        "Record type must be new or existing",
    );
    let name = v.required(Field::BookName, name, "Book name required");
    let author = v.required(Field::BookAuthor, author, "Author required");
    let serial_number = SerialNumber::parse(serial_number);
    if serial_number.is_none() {
        v.push(Field::BookSerial, "Serial required");
    }
    let category = category
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(str::to_string);

    match (kind, name, author, serial_number) {
        (Some(kind), Some(name), Some(author), Some(serial_number)) if v.is_empty() => {
            Ok(BookForm {
                kind,
                name: name.to_string(),
                author: author.to_string(),
                serial_number,
                category,
            })
        }
        _ => Err(v.into_errors()),
    }
}

/// 書籍追加の結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BookUpsert {
    /// 新しい書籍として追加した
    Added(Book, BookAdded),
    /// 同じシリアル番号の書籍を更新した
    Updated(Book, BookUpdated),
}

/// 純粋関数：書籍を追加する（シリアル番号によるupsert）
///
/// ビジネスルール：
/// - 同じシリアル番号の書籍があれば書名・著者（指定があればカテゴリも）を更新
/// - なければ`next_id`で新しい書籍を追加。カテゴリ未指定は`DEFAULT_CATEGORY`
pub fn add_book(existing: Option<&Book>, next_id: BookId, form: BookForm) -> BookUpsert {
    match existing {
        Some(book) => {
            let updated = Book {
                name: form.name,
                author: form.author,
                category: form.category.unwrap_or_else(|| book.category.clone()),
                ..book.clone()
            };
            let event = BookUpdated {
                book_id: updated.id,
                serial_number: updated.serial_number.clone(),
                name: updated.name.clone(),
                author: updated.author.clone(),
            };
            BookUpsert::Updated(updated, event)
        }
        None => {
            let book = Book {
                id: next_id,
                name: form.name,
                author: form.author,
                serial_number: form.serial_number,
                category: form
                    .category
                    .unwrap_or_else(|| DEFAULT_CATEGORY.to_string()),
            };
            let event = BookAdded {
                book_id: book.id,
                serial_number: book.serial_number.clone(),
                name: book.name.clone(),
                category: book.category.clone(),
            };
            BookUpsert::Added(book, event)
        }
    }
}

/// 純粋関数：既存書籍の書名・著者を更新する
pub fn update_book(book: &Book, form: BookForm) -> (Book, BookUpdated) {
    let updated = Book {
        name: form.name,
        author: form.author,
        ..book.clone()
    };
    let event = BookUpdated {
        book_id: updated.id,
        serial_number: updated.serial_number.clone(),
        name: updated.name.clone(),
        author: updated.author.clone(),
    };
    (updated, event)
}
