use super::*;

const RATE_LIMIT_CALLBACK_NOTICE: &str = "Please wait a moment...";
const RATE_LIMIT_COMMAND_NOTICE: &str = "Please wait a moment before sending another command.";

enum Target {
    Chat { chat_id: ChatId, message_id: MessageId },
    Inline(String),
}

pub(super) async fn handle_message(bot: Bot, msg: Message, state: Arc<AppState>) -> Result<()> {
    let Some(text) = msg.text() else {
        return Ok(());
    };
    let Some(command) = Command::parse(text) else {
        return Ok(());
    };
    let user_id = match msg.from() {
        Some(user) => user.id.0,
        None => return Ok(()),
    };

    if !state.limiter.allow(user_id).await {
        debug!("rate limited command from user {}", user_id);
        if let Err(err) = bot.send_message(msg.chat.id, RATE_LIMIT_COMMAND_NOTICE).await {
            error!("send rate limit notice failed: {}", err);
        }
        return Ok(());
    }

    debug!("command {:?} from user {}", command, user_id);
    let markup = state.controller.markup();
    let result = match state.controller.handle_command(&command) {
        Reply::Page(page) => send_page(&bot, msg.chat.id, &page, markup).await,
        Reply::Notice(text) => bot.send_message(msg.chat.id, text).await.map(|_| ()),
    };
    if let Err(err) = result {
        error!("reply to {:?} failed: {}", command, err);
    }
    Ok(())
}

/// Every callback is answered exactly once, before any edit is attempted.
pub(super) async fn handle_callback(
    bot: Bot,
    q: CallbackQuery,
    state: Arc<AppState>,
) -> Result<()> {
    let user_id = q.from.id.0;
    if !state.limiter.allow(user_id).await {
        debug!("rate limited callback from user {}", user_id);
        answer_callback(&bot, &q.id, Some(RATE_LIMIT_CALLBACK_NOTICE), true).await;
        return Ok(());
    }

    let intent = match q.data.as_deref().map(decode) {
        Some(Ok(intent)) => intent,
        Some(Err(err)) => {
            debug!("dropping callback from user {}: {}", user_id, err);
            answer_callback(&bot, &q.id, None, false).await;
            return Ok(());
        }
        None => {
            answer_callback(&bot, &q.id, None, false).await;
            return Ok(());
        }
    };

    debug!("callback {:?} from user {}", intent, user_id);
    let page = match state.controller.handle(&intent) {
        Reply::Notice(text) => {
            answer_callback(&bot, &q.id, Some(&text), false).await;
            return Ok(());
        }
        Reply::Page(page) => {
            answer_callback(&bot, &q.id, None, false).await;
            page
        }
    };

    let target = match (&q.message, &q.inline_message_id) {
        (Some(message), _) => Target::Chat {
            chat_id: message.chat.id,
            message_id: message.id,
        },
        (None, Some(id)) => Target::Inline(id.clone()),
        (None, None) => return Ok(()),
    };
    show_page(&bot, target, &page, state.controller.markup(), state.tidy_chat).await;
    Ok(())
}

pub(super) async fn handle_inline_query(
    bot: Bot,
    q: InlineQuery,
    state: Arc<AppState>,
) -> Result<()> {
    let user_id = q.from.id.0;
    if !state.limiter.allow(user_id).await {
        debug!("rate limited inline query from user {}", user_id);
        return Ok(());
    }

    debug!("inline query {:?} from user {}", q.query, user_id);
    let markup = state.controller.markup();
    let results: Vec<InlineQueryResult> = state
        .controller
        .handle_inline(&q.query)
        .into_iter()
        .map(|result| inline_article(result, markup))
        .collect();
    if let Err(err) = bot
        .answer_inline_query(q.id, results)
        .cache_time(state.inline_cache_seconds)
        .await
    {
        error!("answer inline query failed: {}", err);
    }
    Ok(())
}

async fn answer_callback(bot: &Bot, id: &str, text: Option<&str>, alert: bool) {
    let mut request = bot.answer_callback_query(id);
    if let Some(text) = text {
        request = request.text(text).show_alert(alert);
    }
    if let Err(err) = request.await {
        error!("answer callback failed: {}", err);
    }
}

async fn send_page(
    bot: &Bot,
    chat_id: ChatId,
    page: &RenderedPage,
    markup: Markup,
) -> Result<(), RequestError> {
    bot.send_message(chat_id, page.text.clone())
        .parse_mode(markup.parse_mode())
        .reply_markup(keyboard(page))
        .await?;
    Ok(())
}

async fn show_page(
    bot: &Bot,
    target: Target,
    page: &RenderedPage,
    markup: Markup,
    tidy_chat: bool,
) {
    let result = match target {
        Target::Chat {
            chat_id,
            message_id,
        } if tidy_chat => {
            if let Err(err) = bot.delete_message(chat_id, message_id).await {
                debug!("delete before resend failed: {}", err);
            }
            send_page(bot, chat_id, page, markup).await
        }
        Target::Chat {
            chat_id,
            message_id,
        } => bot
            .edit_message_text(chat_id, message_id, page.text.clone())
            .parse_mode(markup.parse_mode())
            .reply_markup(keyboard(page))
            .await
            .map(|_| ()),
        Target::Inline(id) => bot
            .edit_message_text_inline(id, page.text.clone())
            .parse_mode(markup.parse_mode())
            .reply_markup(keyboard(page))
            .await
            .map(|_| ()),
    };
    match result {
        Ok(()) => {}
        Err(RequestError::Api(ApiError::MessageNotModified)) => {
            debug!("page unchanged, nothing to edit");
        }
        Err(err) => error!("show page failed: {}", err),
    }
}

pub(crate) fn keyboard(page: &RenderedPage) -> InlineKeyboardMarkup {
    let rows: Vec<Vec<InlineKeyboardButton>> = page
        .rows
        .iter()
        .map(|row| {
            row.iter()
                .filter_map(|button| match encode(&button.intent) {
                    Ok(data) => Some(InlineKeyboardButton::callback(button.label.clone(), data)),
                    Err(err) => {
                        warn!("dropping button {:?}: {}", button.label, err);
                        None
                    }
                })
                .collect::<Vec<_>>()
        })
        .filter(|row| !row.is_empty())
        .collect();
    InlineKeyboardMarkup::new(rows)
}

fn inline_article(result: InlineResult, markup: Markup) -> InlineQueryResult {
    let content = |text: String| {
        InputMessageContent::Text(
            InputMessageContentText::new(text).parse_mode(markup.parse_mode()),
        )
    };
    let article = match result {
        InlineResult::Hadith {
            title,
            description,
            page,
        } => {
            let kb = keyboard(&page);
            InlineQueryResultArticle::new(short_id(), title, content(page.text))
                .description(description)
                .reply_markup(kb)
        }
        InlineResult::NoResults { query } => InlineQueryResultArticle::new(
            short_id(),
            "No Results Found",
            content(format!(
                "{} {}",
                markup.escape("No hadiths found for:"),
                markup.bold(&query)
            )),
        )
        .description(format!("No hadiths found for '{}'", query)),
        InlineResult::Help => InlineQueryResultArticle::new(
            short_id(),
            "Hadith Bot Help",
            content(format!(
                "{}\n\n{}\n{}",
                markup.bold("Hadith Bot Inline Mode"),
                markup.escape("• random - Get a random hadith"),
                markup.escape("• search <keyword> - Search hadiths"),
            )),
        )
        .description("Type 'random' or 'search <keyword>'"),
    };
    InlineQueryResult::Article(article)
}

fn short_id() -> String {
    let id = Uuid::new_v4().to_string();
    id.split('-').next().unwrap_or(&id).to_string()
}
