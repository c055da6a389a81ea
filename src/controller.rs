use super::*;

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum Command {
    Start,
    Help,
    Collections,
    Random,
    Search(String),
}

impl Command {
    pub(crate) fn parse(text: &str) -> Option<Command> {
        let name = parse_command(text)?;
        let rest = text
            .splitn(2, |c: char| c.is_whitespace())
            .nth(1)
            .unwrap_or("")
            .trim();
        let command = match name {
            "start" => Command::Start,
            "help" => Command::Help,
            "collections" => Command::Collections,
            "random" => Command::Random,
            "search" => Command::Search(rest.to_string()),
            _ => return None,
        };
        Some(command)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Reply {
    Page(RenderedPage),
    Notice(String),
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) enum InlineResult {
    Hadith {
        title: String,
        description: String,
        page: RenderedPage,
    },
    NoResults {
        query: String,
    },
    Help,
}

pub(crate) struct NavigationController {
    store: Arc<CollectionStore>,
    markup: Markup,
    max_runes: usize,
}

impl NavigationController {
    pub(crate) fn new(store: Arc<CollectionStore>, markup: Markup, max_runes: usize) -> Self {
        NavigationController {
            store,
            markup,
            max_runes,
        }
    }

    pub(crate) fn markup(&self) -> Markup {
        self.markup
    }

    fn renderer(&self) -> Renderer<'_> {
        Renderer::new(&self.store, self.markup, self.max_runes)
    }

    pub(crate) fn handle(&self, intent: &NavigationIntent) -> Reply {
        let views = self.renderer();
        let page = match intent {
            NavigationIntent::Collections { page } => views.collections(*page),
            NavigationIntent::Books { collection, page } => views.books(collection, *page),
            NavigationIntent::Hadiths {
                collection,
                book,
                page,
            } => views.hadiths(collection, *book, *page),
            NavigationIntent::HadithDetail {
                collection,
                book,
                list_page,
                index,
            } => views.hadith_detail(collection, *book, *list_page, *index, 0),
            NavigationIntent::HadithByNumber {
                collection,
                book,
                hadith_number,
            } => {
                views.hadith_by_number(collection, *book, *hadith_number, NumberedFrom::Search, 0)
            }
            NavigationIntent::SearchResults { query, page } => {
                views.search_results(query, *page, NAV_SEARCH_PAGE_SIZE)
            }
            NavigationIntent::Random => views.random(),
            NavigationIntent::TextPage { source, page } => views.text_page(source, *page),
            NavigationIntent::Help => views.help(),
            NavigationIntent::SearchPrompt => {
                return Reply::Notice(views.search_prompt_notice().to_string())
            }
        };
        Reply::Page(page)
    }

    pub(crate) fn handle_command(&self, command: &Command) -> Reply {
        let views = self.renderer();
        let page = match command {
            Command::Start => views.welcome(),
            Command::Help => views.help(),
            Command::Collections => views.collections(1),
            Command::Random => views.random(),
            Command::Search(query) if query.is_empty() => {
                return Reply::Notice(
                    "Please provide a search keyword.\n\nExample: /search prayer".to_string(),
                )
            }
            Command::Search(query) => views.search_results(query, 1, COMMAND_SEARCH_PAGE_SIZE),
        };
        Reply::Page(page)
    }

    pub(crate) fn handle_inline(&self, query: &str) -> Vec<InlineResult> {
        let query = query.trim();
        if query.eq_ignore_ascii_case("random") {
            return match self.store.random_hadith() {
                Some(pick) => vec![self.inline_article(
                    &pick.collection.name,
                    &pick.hadith,
                    pick.book.as_ref(),
                    NumberedFrom::Random,
                )],
                None => vec![InlineResult::Help],
            };
        }

        let keyword = match query.split_once(char::is_whitespace) {
            Some((head, rest)) if head.eq_ignore_ascii_case("search") => rest.trim(),
            _ => "",
        };
        if keyword.is_empty() {
            return vec![InlineResult::Help];
        }

        let hits = self.store.search_hadiths(keyword, 1, INLINE_SEARCH_LIMIT);
        if hits.items.is_empty() {
            return vec![InlineResult::NoResults {
                query: keyword.to_string(),
            }];
        }
        hits.items
            .iter()
            .map(|hadith| {
                let collection = self.store.find_collection_for_hadith(hadith);
                let book = self.store.book_for_hadith(collection, hadith);
                self.inline_article(collection, hadith, book, NumberedFrom::Search)
            })
            .collect()
    }

    fn inline_article(
        &self,
        collection: &str,
        hadith: &Hadith,
        book: Option<&Book>,
        from: NumberedFrom,
    ) -> InlineResult {
        let page = self
            .renderer()
            .hadith_page(collection, hadith, book, from, 0);
        let name = self.store.display_name(collection);
        let title = match from {
            NumberedFrom::Random => format!("Random Hadith - {}", name),
            NumberedFrom::Search => format!("{} #{}", name, hadith.hadith_number),
        };
        InlineResult::Hadith {
            title,
            description: truncate_label(hadith.english.trim(), INLINE_DESCRIPTION_CHARS),
            page,
        }
    }
}
