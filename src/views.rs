use super::*;

const DOCUMENT_LABELS: &[&str] = &["📜 Hadith", "Arabic:", "English:", "Reference:", "Grade:"];

#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Button {
    pub(crate) label: String,
    pub(crate) intent: NavigationIntent,
}

impl Button {
    pub(crate) fn new(label: impl Into<String>, intent: NavigationIntent) -> Self {
        Button {
            label: label.into(),
            intent,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) struct RenderedPage {
    pub(crate) text: String,
    pub(crate) rows: Vec<Vec<Button>>,
}

impl RenderedPage {
    fn new(text: String, rows: Vec<Vec<Button>>) -> Self {
        let rows = rows.into_iter().filter(|row| !row.is_empty()).collect();
        RenderedPage { text, rows }
    }

    pub(crate) fn buttons(&self) -> impl Iterator<Item = &Button> {
        self.rows.iter().flatten()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum NumberedFrom {
    Search,
    Random,
}

pub(crate) struct Renderer<'a> {
    store: &'a CollectionStore,
    markup: Markup,
    max_runes: usize,
}

impl<'a> Renderer<'a> {
    pub(crate) fn new(store: &'a CollectionStore, markup: Markup, max_runes: usize) -> Self {
        Renderer {
            store,
            markup,
            max_runes,
        }
    }

    pub(crate) fn welcome(&self) -> RenderedPage {
        let m = self.markup;
        let text = format!(
            "{}\n\n{}\n\n{}\n\n{}\n{}\n{}\n{}\n{}\n\n{}",
            m.bold("Welcome to Hadith Portal Bot 🕌"),
            m.escape(
                "This bot provides access to authentic hadith collections \
                 from the six major books of hadith."
            ),
            m.bold("Available Commands:"),
            m.escape("• /start - Start the bot"),
            m.escape("• /collections - Browse hadith collections"),
            m.escape("• /search <keyword> - Search hadiths"),
            m.escape("• /random - Get a random hadith"),
            m.escape("• /help - Get help"),
            m.escape("Use the inline keyboard below to navigate:"),
        );
        RenderedPage::new(
            text,
            vec![
                vec![
                    Button::new("📚 Browse Collections", NavigationIntent::Collections { page: 1 }),
                    Button::new("🔍 Search Hadith", NavigationIntent::SearchPrompt),
                ],
                vec![
                    Button::new("🎲 Random Hadith", NavigationIntent::Random),
                    Button::new("❓ Help", NavigationIntent::Help),
                ],
            ],
        )
    }

    pub(crate) fn help(&self) -> RenderedPage {
        let m = self.markup;
        let mut lines = vec![
            m.bold("Hadith Portal Bot - Help ❓"),
            String::new(),
            m.bold("Commands:"),
            m.escape("/start - Welcome message and main menu"),
            m.escape("/collections - Browse all hadith collections"),
            m.escape("/search <keyword> - Search for hadiths"),
            m.escape("/random - Get a random hadith"),
            m.escape("/help - Show this help message"),
            String::new(),
            m.bold("How to Search:"),
            m.escape("Use /search followed by your keyword"),
            m.escape("Example: /search prayer"),
            String::new(),
            m.bold("Collections Available:"),
        ];
        for collection in self.store.collections() {
            lines.push(m.escape(&format!("• {}", collection.title)));
        }
        RenderedPage::new(
            lines.join("\n"),
            vec![vec![
                Button::new("📚 Browse Collections", NavigationIntent::Collections { page: 1 }),
                Button::new("🎲 Random Hadith", NavigationIntent::Random),
            ]],
        )
    }

    pub(crate) fn search_prompt_notice(&self) -> &'static str {
        "Please use /search <keyword> command to search."
    }

    pub(crate) fn collections(&self, page: u32) -> RenderedPage {
        let m = self.markup;
        let page = page.max(1);
        let collections = self.store.collections();
        if collections.is_empty() {
            return RenderedPage::new(m.escape("No collections are available."), Vec::new());
        }

        let start = (page as usize - 1) * COLLECTIONS_PER_PAGE;
        if start >= collections.len() {
            return RenderedPage::new(
                m.escape("No collections on this page."),
                vec![vec![Button::new(
                    "⬅️ Back to Collections",
                    NavigationIntent::Collections { page: 1 },
                )]],
            );
        }
        let end = (start + COLLECTIONS_PER_PAGE).min(collections.len());

        let mut rows: Vec<Vec<Button>> = collections[start..end]
            .iter()
            .map(|c| {
                vec![Button::new(
                    c.title.clone(),
                    NavigationIntent::Books {
                        collection: c.name.clone(),
                        page: 1,
                    },
                )]
            })
            .collect();

        let mut nav = Vec::new();
        if page > 1 {
            nav.push(Button::new(
                "⬅️ Previous",
                NavigationIntent::Collections { page: page - 1 },
            ));
        }
        if end < collections.len() {
            nav.push(Button::new(
                "Next ➡️",
                NavigationIntent::Collections { page: page + 1 },
            ));
        }
        rows.push(nav);

        let text = format!(
            "{}\n\n{}",
            m.bold("📚 Hadith Collections"),
            m.escape("Select a collection to browse:")
        );
        RenderedPage::new(text, rows)
    }

    pub(crate) fn books(&self, collection: &str, page: u32) -> RenderedPage {
        let m = self.markup;
        let page = page.max(1);
        let back = vec![Button::new(
            "⬅️ Back to Collections",
            NavigationIntent::Collections { page: 1 },
        )];
        let books = self.store.books(collection);
        if self.store.collection(collection).is_none() || books.is_empty() {
            return RenderedPage::new(m.escape("No books found in this collection."), vec![back]);
        }

        let start = (page as usize - 1) * BOOKS_PER_PAGE;
        if start >= books.len() {
            return RenderedPage::new(
                m.escape("No books on this page."),
                vec![
                    vec![Button::new(
                        "⏮ First Page",
                        NavigationIntent::Books {
                            collection: collection.to_string(),
                            page: 1,
                        },
                    )],
                    back,
                ],
            );
        }
        let end = (start + BOOKS_PER_PAGE).min(books.len());

        let mut rows: Vec<Vec<Button>> = books[start..end]
            .iter()
            .map(|b| {
                let title = if b.title.trim().is_empty() {
                    format!("Book {}", b.book_number)
                } else {
                    truncate_label(&b.title, BOOK_LABEL_CHARS)
                };
                vec![Button::new(
                    format!("📖 {}", title),
                    NavigationIntent::Hadiths {
                        collection: collection.to_string(),
                        book: b.book_number,
                        page: 1,
                    },
                )]
            })
            .collect();

        let mut nav = Vec::new();
        if page > 1 {
            nav.push(Button::new(
                "⬅️ Prev",
                NavigationIntent::Books {
                    collection: collection.to_string(),
                    page: page - 1,
                },
            ));
        }
        if end < books.len() {
            nav.push(Button::new(
                "Next ➡️",
                NavigationIntent::Books {
                    collection: collection.to_string(),
                    page: page + 1,
                },
            ));
        }
        rows.push(nav);
        rows.push(back);

        let text = format!(
            "{}\n\n{}",
            m.bold(&format!("📚 {}", self.store.display_name(collection))),
            m.escape("Select a book:")
        );
        RenderedPage::new(text, rows)
    }

    pub(crate) fn hadiths(&self, collection: &str, book: u32, page: u32) -> RenderedPage {
        let m = self.markup;
        let result = self.store.hadiths(collection, book, page, HADITHS_PER_PAGE);
        let back = vec![Button::new(
            "⬅️ Back to Books",
            NavigationIntent::Books {
                collection: collection.to_string(),
                page: 1,
            },
        )];
        if result.total == 0 {
            return RenderedPage::new(m.escape("No hadiths found in this book."), vec![back]);
        }
        if result.items.is_empty() {
            return RenderedPage::new(
                m.escape(&format!(
                    "No hadiths on page {}/{}.",
                    result.page, result.total_pages
                )),
                vec![
                    vec![Button::new(
                        "⏮ First Page",
                        NavigationIntent::Hadiths {
                            collection: collection.to_string(),
                            book,
                            page: 1,
                        },
                    )],
                    back,
                ],
            );
        }

        let mut rows: Vec<Vec<Button>> = result
            .items
            .iter()
            .enumerate()
            .map(|(i, hadith)| {
                vec![Button::new(
                    hadith_label(hadith),
                    NavigationIntent::HadithDetail {
                        collection: collection.to_string(),
                        book,
                        list_page: result.page,
                        index: i as u32,
                    },
                )]
            })
            .collect();

        let mut nav = Vec::new();
        if result.page > 1 {
            nav.push(Button::new(
                "⬅️ Prev",
                NavigationIntent::Hadiths {
                    collection: collection.to_string(),
                    book,
                    page: result.page - 1,
                },
            ));
        }
        if result.page < result.total_pages {
            nav.push(Button::new(
                "Next ➡️",
                NavigationIntent::Hadiths {
                    collection: collection.to_string(),
                    book,
                    page: result.page + 1,
                },
            ));
        }
        rows.push(nav);
        rows.push(back);

        let book_title = self
            .store
            .book(collection, book)
            .map(|b| b.title.as_str())
            .unwrap_or("Unknown");
        let text = format!(
            "{}\n{}\n\n{}",
            m.bold(&format!("📖 {}", self.store.display_name(collection))),
            m.escape(&format!("📑 {}", truncate_label(book_title, HEADER_LABEL_CHARS))),
            m.escape(&format!(
                "Page {}/{} - Showing {} hadiths:",
                result.page,
                result.total_pages,
                result.items.len()
            )),
        );
        RenderedPage::new(text, rows)
    }

    /// Re-fetches listing page `list_page` and picks `index` from it. A stale
    /// index renders a not-found notice that leads back to the same listing.
    pub(crate) fn hadith_detail(
        &self,
        collection: &str,
        book: u32,
        list_page: u32,
        index: u32,
        text_page: u32,
    ) -> RenderedPage {
        let back = vec![Button::new(
            "⬅️ Back",
            NavigationIntent::Hadiths {
                collection: collection.to_string(),
                book,
                page: list_page,
            },
        )];
        let result = self.store.hadiths(collection, book, list_page, HADITHS_PER_PAGE);
        let Some(hadith) = result.items.get(index as usize) else {
            return RenderedPage::new(self.markup.escape("Hadith not found."), vec![back]);
        };

        let document = hadith_document(
            hadith,
            self.store.collection(collection),
            self.store.book(collection, book),
        );
        let source = TextSource::Detail {
            collection: collection.to_string(),
            book,
            list_page,
            index,
        };
        let actions = vec![
            vec![
                Button::new("🎲 Random", NavigationIntent::Random),
                Button::new("🔍 Search", NavigationIntent::SearchPrompt),
            ],
            back,
        ];
        self.document_page(&document, source, text_page, actions)
    }

    pub(crate) fn hadith_by_number(
        &self,
        collection: &str,
        book: u32,
        hadith_number: u32,
        from: NumberedFrom,
        text_page: u32,
    ) -> RenderedPage {
        match self.store.find_hadith(collection, book, hadith_number) {
            (Some(hadith), book) => self.hadith_page(collection, hadith, book, from, text_page),
            (None, _) => RenderedPage::new(
                self.markup.escape("Hadith not found."),
                vec![vec![
                    Button::new("📚 Browse Collections", NavigationIntent::Collections { page: 1 }),
                    Button::new("🔍 Search", NavigationIntent::SearchPrompt),
                ]],
            ),
        }
    }

    /// Renders a hadith already in hand. Its text page buttons name the book
    /// as well as the number, so paging stays on this hadith.
    pub(crate) fn hadith_page(
        &self,
        collection: &str,
        hadith: &Hadith,
        book: Option<&Book>,
        from: NumberedFrom,
        text_page: u32,
    ) -> RenderedPage {
        let document = hadith_document(hadith, self.store.collection(collection), book);
        let collection = collection.to_string();
        let book = book.map(|b| b.book_number).unwrap_or(0);
        let hadith_number = hadith.hadith_number;
        let (source, random_label) = match from {
            NumberedFrom::Search => (
                TextSource::Search {
                    collection,
                    book,
                    hadith_number,
                },
                "🎲 Random",
            ),
            NumberedFrom::Random => (
                TextSource::Random {
                    collection,
                    book,
                    hadith_number,
                },
                "🎲 Another Random",
            ),
        };
        let actions = vec![vec![
            Button::new(random_label, NavigationIntent::Random),
            Button::new("🔍 Search", NavigationIntent::SearchPrompt),
        ]];
        self.document_page(&document, source, text_page, actions)
    }

    pub(crate) fn random(&self) -> RenderedPage {
        match self.store.random_hadith() {
            Some(pick) => self.hadith_page(
                &pick.collection.name,
                &pick.hadith,
                pick.book.as_ref(),
                NumberedFrom::Random,
                0,
            ),
            None => RenderedPage::new(
                self.markup
                    .escape("Sorry, couldn't fetch a random hadith. Please try again."),
                vec![vec![
                    Button::new("🎲 Try Again", NavigationIntent::Random),
                    Button::new("📚 Browse Collections", NavigationIntent::Collections { page: 1 }),
                ]],
            ),
        }
    }

    pub(crate) fn text_page(&self, source: &TextSource, page: u32) -> RenderedPage {
        match source {
            TextSource::Detail {
                collection,
                book,
                list_page,
                index,
            } => self.hadith_detail(collection, *book, *list_page, *index, page),
            TextSource::Search {
                collection,
                book,
                hadith_number,
            } => self.hadith_by_number(
                collection,
                *book,
                *hadith_number,
                NumberedFrom::Search,
                page,
            ),
            TextSource::Random {
                collection,
                book,
                hadith_number,
            } => self.hadith_by_number(
                collection,
                *book,
                *hadith_number,
                NumberedFrom::Random,
                page,
            ),
        }
    }

    pub(crate) fn search_results(&self, query: &str, page: u32, per_page: usize) -> RenderedPage {
        let m = self.markup;
        let result = self.store.search_hadiths(query, page, per_page);
        if result.total == 0 {
            return RenderedPage::new(
                format!("{} {}", m.escape("No results found for:"), m.bold(query)),
                Vec::new(),
            );
        }
        if result.items.is_empty() {
            return RenderedPage::new(
                format!(
                    "{} {} {}",
                    m.escape("No more results for:"),
                    m.bold(query),
                    m.escape(&format!("(page {}/{})", result.page, result.total_pages))
                ),
                vec![vec![Button::new(
                    "⏮ First Page",
                    NavigationIntent::SearchResults {
                        query: query.to_string(),
                        page: 1,
                    },
                )]],
            );
        }

        let mut rows: Vec<Vec<Button>> = result
            .items
            .iter()
            .map(|hadith| {
                let collection = self.store.find_collection_for_hadith(hadith);
                let book = self
                    .store
                    .book_for_hadith(collection, hadith)
                    .map(|b| b.book_number)
                    .unwrap_or(0);
                vec![Button::new(
                    hadith_label(hadith),
                    NavigationIntent::HadithByNumber {
                        collection: collection.to_string(),
                        book,
                        hadith_number: hadith.hadith_number,
                    },
                )]
            })
            .collect();

        let mut nav = Vec::new();
        if result.page > 1 {
            nav.push(Button::new(
                "⬅️ Prev",
                NavigationIntent::SearchResults {
                    query: query.to_string(),
                    page: result.page - 1,
                },
            ));
        }
        if result.page < result.total_pages {
            nav.push(Button::new(
                "Next ➡️",
                NavigationIntent::SearchResults {
                    query: query.to_string(),
                    page: result.page + 1,
                },
            ));
        }
        rows.push(nav);

        let text = format!(
            "{} {}\n\n{}\n\n{}",
            m.bold("🔍 Search Results for:"),
            m.escape(query),
            m.escape(&format!(
                "Found {} results. Page {}/{}",
                result.total, result.page, result.total_pages
            )),
            m.italic("Click on a hadith to view full details"),
        );
        RenderedPage::new(text, rows)
    }

    fn document_page(
        &self,
        document: &str,
        source: TextSource,
        index: u32,
        actions: Vec<Vec<Button>>,
    ) -> RenderedPage {
        let pages = paginate(document, self.max_runes);
        let current = clamp_page(index, pages.len());
        let mut text = self
            .markup
            .format_document_page(&pages[current], DOCUMENT_LABELS);

        let mut rows = Vec::new();
        if pages.len() > 1 {
            text.push_str("\n\n");
            text.push_str(
                &self
                    .markup
                    .italic(&format!("Page {}/{}", current + 1, pages.len())),
            );
            let mut nav = Vec::new();
            if current > 0 {
                nav.push(Button::new(
                    "⬅️ Prev",
                    NavigationIntent::TextPage {
                        source: source.clone(),
                        page: current as u32 - 1,
                    },
                ));
            }
            if current + 1 < pages.len() {
                nav.push(Button::new(
                    "Next ➡️",
                    NavigationIntent::TextPage {
                        source: source.clone(),
                        page: current as u32 + 1,
                    },
                ));
            }
            rows.push(nav);
        }
        rows.extend(actions);
        RenderedPage::new(text, rows)
    }
}

/// Plain-text rendering of one hadith; markup is applied per page after
/// pagination so a split never lands inside a tag or an escape.
pub(crate) fn hadith_document(
    hadith: &Hadith,
    collection: Option<&Collection>,
    book: Option<&Book>,
) -> String {
    let collection_title = collection
        .map(|c| c.title.as_str())
        .unwrap_or("Unknown Collection");
    let book_number = book.map(|b| b.book_number).unwrap_or(0);
    format!(
        "📜 Hadith\n\nArabic:\n{}\n\nEnglish:\n{}\n\nReference: {}, Book {}, Hadith #{}\nGrade: {}",
        hadith.arabic.trim(),
        hadith.english.trim(),
        collection_title,
        book_number,
        hadith.hadith_number,
        hadith.grade_or_default(),
    )
}

pub(crate) fn hadith_label(hadith: &Hadith) -> String {
    format!(
        "📜 Hadith #{} [{}]",
        hadith.hadith_number,
        hadith.grade_or_default()
    )
}

pub(crate) fn truncate_label(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let kept: String = text.chars().take(max_chars.saturating_sub(3)).collect();
    format!("{}...", kept)
}
