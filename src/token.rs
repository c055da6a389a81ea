use super::*;

pub(crate) const MAX_TOKEN_BYTES: usize = 64;

const SEPARATOR: char = ':';

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum NavigationIntent {
    Collections {
        page: u32,
    },
    Books {
        collection: String,
        page: u32,
    },
    Hadiths {
        collection: String,
        book: u32,
        page: u32,
    },
    HadithDetail {
        collection: String,
        book: u32,
        list_page: u32,
        index: u32,
    },
    /// `book == 0` leaves the book open and takes the first hadith with
    /// that number.
    HadithByNumber {
        collection: String,
        book: u32,
        hadith_number: u32,
    },
    SearchResults {
        query: String,
        page: u32,
    },
    Random,
    /// `page` is 0-based, unlike listing pages.
    TextPage {
        source: TextSource,
        page: u32,
    },
    Help,
    SearchPrompt,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum TextSource {
    Detail {
        collection: String,
        book: u32,
        list_page: u32,
        index: u32,
    },
    Search {
        collection: String,
        book: u32,
        hadith_number: u32,
    },
    Random {
        collection: String,
        book: u32,
        hadith_number: u32,
    },
}

#[derive(Error, Debug, PartialEq, Eq)]
pub(crate) enum EncodeError {
    #[error("field {0:?} contains the token separator")]
    Separator(String),
    #[error("token is {0} bytes, limit is {MAX_TOKEN_BYTES}")]
    TooLong(usize),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum DecodeReason {
    UnknownTag,
    ArityMismatch,
    FieldParseFailure,
}

impl fmt::Display for DecodeReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            DecodeReason::UnknownTag => "unknown tag",
            DecodeReason::ArityMismatch => "wrong number of fields",
            DecodeReason::FieldParseFailure => "unparsable field",
        };
        f.write_str(text)
    }
}

#[derive(Error, Debug, PartialEq, Eq)]
#[error("cannot decode token {token:?}: {reason}")]
pub(crate) struct DecodeError {
    pub(crate) token: String,
    pub(crate) reason: DecodeReason,
}

pub(crate) fn encode(intent: &NavigationIntent) -> Result<String, EncodeError> {
    let fields: Vec<String> = match intent {
        NavigationIntent::Collections { page } => vec!["collections".into(), page.to_string()],
        NavigationIntent::Books { collection, page } => vec![
            "books".into(),
            slug_field(collection)?,
            page.to_string(),
        ],
        NavigationIntent::Hadiths {
            collection,
            book,
            page,
        } => vec![
            "hadiths".into(),
            slug_field(collection)?,
            book.to_string(),
            page.to_string(),
        ],
        NavigationIntent::HadithDetail {
            collection,
            book,
            list_page,
            index,
        } => vec![
            "hadith_detail".into(),
            slug_field(collection)?,
            book.to_string(),
            list_page.to_string(),
            index.to_string(),
        ],
        NavigationIntent::HadithByNumber {
            collection,
            book,
            hadith_number,
        } => {
            let mut fields = vec![
                "hadith_search".to_string(),
                slug_field(collection)?,
                hadith_number.to_string(),
            ];
            if *book != 0 {
                fields.push(book.to_string());
            }
            fields
        }
        NavigationIntent::SearchResults { query, page } => vec![
            "search_next".into(),
            escape_query(query),
            page.to_string(),
        ],
        NavigationIntent::Random => vec!["random".into()],
        NavigationIntent::Help => vec!["help".into()],
        NavigationIntent::SearchPrompt => vec!["search".into()],
        NavigationIntent::TextPage { source, page } => {
            let mut fields = vec!["hadith_page".to_string()];
            match source {
                TextSource::Detail {
                    collection,
                    book,
                    list_page,
                    index,
                } => {
                    fields.push("d".into());
                    fields.push(slug_field(collection)?);
                    fields.push(book.to_string());
                    fields.push(list_page.to_string());
                    fields.push(index.to_string());
                }
                TextSource::Search {
                    collection,
                    book,
                    hadith_number,
                } => {
                    fields.push("s".into());
                    fields.push(slug_field(collection)?);
                    fields.push(book.to_string());
                    fields.push(hadith_number.to_string());
                }
                TextSource::Random {
                    collection,
                    book,
                    hadith_number,
                } => {
                    fields.push("r".into());
                    fields.push(slug_field(collection)?);
                    fields.push(book.to_string());
                    fields.push(hadith_number.to_string());
                }
            }
            fields.push(page.to_string());
            fields
        }
    };

    let token = fields.join(":");
    if token.len() > MAX_TOKEN_BYTES {
        return Err(EncodeError::TooLong(token.len()));
    }
    Ok(token)
}

/// Numeric fields that fail to parse fall back to 1 for pages and 0 for
/// everything else.
pub(crate) fn decode(token: &str) -> Result<NavigationIntent, DecodeError> {
    let fail = |reason| DecodeError {
        token: token.to_string(),
        reason,
    };
    let parts: Vec<&str> = token.split(SEPARATOR).collect();
    let (tag, fields) = match parts.split_first() {
        Some((tag, fields)) => (*tag, fields),
        None => return Err(fail(DecodeReason::UnknownTag)),
    };
    let arity = |count: usize| {
        if fields.len() == count {
            Ok(())
        } else {
            Err(fail(DecodeReason::ArityMismatch))
        }
    };

    let intent = match tag {
        "collections" => {
            arity(1)?;
            NavigationIntent::Collections {
                page: page_field(fields[0]),
            }
        }
        "books" => {
            arity(2)?;
            NavigationIntent::Books {
                collection: fields[0].to_string(),
                page: page_field(fields[1]),
            }
        }
        "hadiths" => {
            arity(3)?;
            NavigationIntent::Hadiths {
                collection: fields[0].to_string(),
                book: number_field(fields[1]),
                page: page_field(fields[2]),
            }
        }
        "hadith_detail" => {
            arity(4)?;
            NavigationIntent::HadithDetail {
                collection: fields[0].to_string(),
                book: number_field(fields[1]),
                list_page: page_field(fields[2]),
                index: number_field(fields[3]),
            }
        }
        "hadith_search" => {
            if fields.len() != 3 {
                arity(2)?;
            }
            NavigationIntent::HadithByNumber {
                collection: fields[0].to_string(),
                book: fields.get(2).map(|b| number_field(b)).unwrap_or(0),
                hadith_number: number_field(fields[1]),
            }
        }
        "search_next" | "search_prev" => {
            arity(2)?;
            let query = unescape_query(fields[0])
                .ok_or_else(|| fail(DecodeReason::FieldParseFailure))?;
            NavigationIntent::SearchResults {
                query,
                page: page_field(fields[1]),
            }
        }
        "random" => {
            arity(0)?;
            NavigationIntent::Random
        }
        "help" => {
            arity(0)?;
            NavigationIntent::Help
        }
        "search" => {
            arity(0)?;
            NavigationIntent::SearchPrompt
        }
        "hadith_page" => {
            let Some((kind, rest)) = fields.split_first() else {
                return Err(fail(DecodeReason::ArityMismatch));
            };
            let source = match *kind {
                "d" => {
                    if rest.len() != 5 {
                        return Err(fail(DecodeReason::ArityMismatch));
                    }
                    TextSource::Detail {
                        collection: rest[0].to_string(),
                        book: number_field(rest[1]),
                        list_page: page_field(rest[2]),
                        index: number_field(rest[3]),
                    }
                }
                "s" | "r" => {
                    if rest.len() != 4 {
                        return Err(fail(DecodeReason::ArityMismatch));
                    }
                    let collection = rest[0].to_string();
                    let book = number_field(rest[1]);
                    let hadith_number = number_field(rest[2]);
                    if *kind == "s" {
                        TextSource::Search {
                            collection,
                            book,
                            hadith_number,
                        }
                    } else {
                        TextSource::Random {
                            collection,
                            book,
                            hadith_number,
                        }
                    }
                }
                _ => return Err(fail(DecodeReason::UnknownTag)),
            };
            let page = rest.last().map(|p| number_field(p)).unwrap_or(0);
            NavigationIntent::TextPage { source, page }
        }
        _ => return Err(fail(DecodeReason::UnknownTag)),
    };
    Ok(intent)
}

fn slug_field(value: &str) -> Result<String, EncodeError> {
    if value.contains(SEPARATOR) {
        return Err(EncodeError::Separator(value.to_string()));
    }
    Ok(value.to_string())
}

fn page_field(raw: &str) -> u32 {
    raw.trim().parse().unwrap_or(1)
}

fn number_field(raw: &str) -> u32 {
    raw.trim().parse().unwrap_or(0)
}

pub(crate) fn escape_query(query: &str) -> String {
    let mut out = String::with_capacity(query.len());
    for c in query.chars() {
        match c {
            '%' => out.push_str("%25"),
            ':' => out.push_str("%3A"),
            _ => out.push(c),
        }
    }
    out
}

pub(crate) fn unescape_query(field: &str) -> Option<String> {
    let mut out = String::with_capacity(field.len());
    let mut rest = field;
    while let Some(pos) = rest.find('%') {
        out.push_str(&rest[..pos]);
        let escape = rest.get(pos + 1..pos + 3)?;
        match escape {
            "25" => out.push('%'),
            "3A" | "3a" => out.push(':'),
            _ => return None,
        }
        rest = &rest[pos + 3..];
    }
    out.push_str(rest);
    Some(out)
}
