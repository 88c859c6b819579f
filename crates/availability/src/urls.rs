//! Deep-link builders.
//!
//! Pure functions of the keyword. They never touch the network, so a source
//! whose resolver failed still gets a working link.
//!
//! The library and bookstore links use form encoding (space becomes `+`), as
//! their search forms submit. The retail chain and marketplace links use plain
//! percent encoding (space becomes `%20`).

use url::form_urlencoded;
use urlencoding::encode;

use crate::models::SourceId;

// Library A
pub const GIFU_TOP_URL: &str = "https://www1.gifu-lib.jp/winj/opac/top.do";
pub const GIFU_SEARCH_URL: &str = "https://www1.gifu-lib.jp/winj/opac/search-standard.do";

// Library B
pub const KANI_ENTRY_URL: &str = "https://www.kani-lib.jp/csp/opw/OPW/OPWSRCH1.CSP?DB=LIB&MODE=1";
pub const KANI_SEARCH_URL: &str = "https://www.kani-lib.jp/csp/opw/OPW/OPWSRCHLIST.CSP";

// Bookstore
pub const BOOKSTORE_SEARCH_URL: &str =
    "https://www.books-sanseido.jp/booksearch/BookSearchExec.action";
pub const BOOKSTORE_SHOP_CODE: &str = "0458";

// Retail chain
pub const RETAIL_CHAIN_SEARCH_URL: &str = "https://store-tsutaya.tsite.jp/search/result/";
pub const RETAIL_CHAIN_SELECT_URL: &str = "https://store-tsutaya.tsite.jp/search/result/select";
pub const RETAIL_CHAIN_STOCK_URL: &str =
    "https://store-tsutaya.tsite.jp/search/result/stock/result";
pub const RETAIL_CHAIN_ENTRY_URL: &str =
    "https://store-tsutaya.tsite.jp/search/?sheader_item-search";

// Marketplace
pub const MARKETPLACE_SEARCH_URL: &str = "https://www.amazon.co.jp/s";

/// Query parameters of the Library A full-text search.
pub fn gifu_search_params(keyword: &str) -> Vec<(&'static str, String)> {
    vec![
        ("txt_word", keyword.to_string()),
        ("hid_word_column", "fulltext".to_string()),
        ("submit_btn_searchEasy", "search".to_string()),
    ]
}

/// Query parameters of the Library B search list.
pub fn kani_search_params(keyword: &str) -> Vec<(&'static str, String)> {
    vec![
        ("opr(1)", "OR".to_string()),
        ("DB", "LIB".to_string()),
        ("PID", "OPWSRCH1".to_string()),
        ("FLG", "SEARCH".to_string()),
        ("MODE", "1".to_string()),
        ("SORT", "-3".to_string()),
        ("qual(1)", "MZALL".to_string()),
        ("text(1)", keyword.to_string()),
    ]
}

/// Query parameters of the bookstore search. The empty fields are part of
/// the form contract and must be sent.
pub fn bookstore_search_params(keyword: &str) -> Vec<(&'static str, String)> {
    vec![
        ("shopCode", BOOKSTORE_SHOP_CODE.to_string()),
        ("keyword", keyword.to_string()),
        ("defaultShopCode", String::new()),
        ("title", String::new()),
        ("author", String::new()),
        ("isbn", String::new()),
        ("genreCode", String::new()),
        ("search", "検索".to_string()),
    ]
}

/// Query parameters of the retail chain edition selection page.
pub fn retail_chain_select_params(work_id: &str) -> Vec<(&'static str, String)> {
    vec![
        ("saleType", "sell".to_string()),
        ("workId", work_id.to_string()),
        ("itemType", "book".to_string()),
    ]
}

fn with_form_query(base: &str, pairs: &[(&str, String)]) -> String {
    let mut serializer = form_urlencoded::Serializer::new(String::new());
    for (name, value) in pairs {
        serializer.append_pair(name, value);
    }
    format!("{}?{}", base, serializer.finish())
}

pub fn build_gifu_url(keyword: &str) -> String {
    let mut params = vec![("lang", "ja".to_string())];
    params.extend(gifu_search_params(keyword));
    with_form_query(GIFU_SEARCH_URL, &params)
}

pub fn build_kani_url(keyword: &str) -> String {
    with_form_query(KANI_SEARCH_URL, &kani_search_params(keyword))
}

pub fn build_bookstore_url(keyword: &str) -> String {
    with_form_query(BOOKSTORE_SEARCH_URL, &bookstore_search_params(keyword))
}

/// Retail chain keyword listing. Also the fallback link when discovery stops early.
pub fn build_retail_chain_search_url(keyword: &str) -> String {
    format!(
        "{}?keyword={}&itemType=book&limit=20",
        RETAIL_CHAIN_SEARCH_URL,
        encode(keyword)
    )
}

/// Store-scoped stock page for a discovered candidate.
pub fn build_retail_chain_stock_url(work_id: &str, product_key: &str, store_keyword: &str) -> String {
    format!(
        "{}?workId={}&saleType=sell&itemType=book&productKey={}&storeSearchKeyword={}",
        RETAIL_CHAIN_STOCK_URL,
        encode(work_id),
        encode(product_key),
        encode(store_keyword)
    )
}

/// Generic retail chain search entry, used when resolution errored.
pub fn build_retail_chain_entry_url() -> String {
    RETAIL_CHAIN_ENTRY_URL.to_string()
}

pub fn build_marketplace_url(keyword: &str) -> String {
    format!("{}?k={}", MARKETPLACE_SEARCH_URL, encode(keyword))
}

/// Deep link for any source.
pub fn build_url(source: SourceId, keyword: &str) -> String {
    match source {
        SourceId::Gifu => build_gifu_url(keyword),
        SourceId::Kani => build_kani_url(keyword),
        SourceId::Bookstore => build_bookstore_url(keyword),
        SourceId::RetailChain => build_retail_chain_search_url(keyword),
        SourceId::Marketplace => build_marketplace_url(keyword),
    }
}
