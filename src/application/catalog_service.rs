use crate::domain::{
    Book,
    book::{SearchCriteria, SearchOutcome, search},
};

use super::{LibraryApplicationError, Result, ServiceDependencies};

/// 全書籍の一覧
pub async fn list_books(deps: &ServiceDependencies) -> Result<Vec<Book>> {
    deps.catalog
        .list()
        .await
        .map_err(LibraryApplicationError::CatalogError)
}

/// 蔵書を検索する
///
/// 書名（部分一致・大文字小文字を区別しない）とカテゴリ（完全一致）のAND条件。
/// どちらも未入力の場合は検証エラー。該当なしは`SearchOutcome::NoResults`。
pub async fn search_books(
    deps: &ServiceDependencies,
    name: &str,
    category: &str,
) -> Result<SearchOutcome> {
    let criteria = SearchCriteria::parse(name, category)?;
    let books = list_books(deps).await?;
    Ok(search(&books, &criteria))
}
