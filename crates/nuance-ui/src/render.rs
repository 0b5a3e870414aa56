use std::fmt::Write;

use nuance_types::{CardView, ChatMessage, ChatRole, ExploreView, LoadingState, Tab};

const EMPTY_RESULTS: &str = "কোনো ফলাফল পাওয়া যায়নি। অন্য কোনো বিষয় অনুসন্ধান করুন।";
const EMPTY_DICTIONARY: &str = "আপনার ডিকশনারি খালি";
const EMPTY_DICTIONARY_HINT: &str =
    "অনুসন্ধান ট্যাবের যেকোনো কার্ড /save <n> দিয়ে এখানে যোগ করুন। শব্দ খুঁজতে /tab explore";

pub const HELP: &str = "\
কমান্ড:
  <বিষয়>              বিষয় অনুসন্ধান (অ্যাসিস্ট্যান্ট খোলা থাকলে প্রশ্ন)
  /search <বিষয়>      বিষয় অনুসন্ধান
  /topics             জনপ্রিয় বিষয়
  /topic <n>          জনপ্রিয় বিষয় n অনুসন্ধান
  /retry              পুনরায় চেষ্টা করুন
  /reset              প্রথম পাতা
  /save <n>           কার্ড n সেভ/সরান
  /tab explore|dictionary
  /chat               কোরআনিক অ্যাসিস্ট্যান্ট খুলুন/বন্ধ করুন
  /ask <প্রশ্ন>        অ্যাসিস্ট্যান্টকে প্রশ্ন
  /quit";

pub fn tab_bar(active: Tab, saved_count: usize) -> String {
    let marker = |tab: Tab| if tab == active { "▶" } else { " " };
    let count = if saved_count > 0 {
        format!(" ({saved_count})")
    } else {
        String::new()
    };
    format!(
        "{} অনুসন্ধান   {} আমার ডিকশনারি{count}",
        marker(Tab::Explore),
        marker(Tab::Dictionary)
    )
}

pub fn explore(view: &ExploreView, show_category: bool) -> String {
    let mut out = String::new();

    let heading = if view.status == LoadingState::Loading {
        format!("{} সম্পর্কে অনুসন্ধান করা হচ্ছে...", view.topic)
    } else {
        format!("{} সম্পর্কিত শব্দসমূহ", view.topic)
    };
    let _ = write!(out, "== {heading}");
    if view.can_reset {
        out.push_str("   [/reset প্রথম পাতা]");
    }
    out.push('\n');

    match view.status {
        LoadingState::Loading => out.push_str("...\n"),
        LoadingState::Error => {
            let message = view.error.as_deref().unwrap_or_default();
            let _ = writeln!(out, "{message}\n[/retry পুনরায় চেষ্টা করুন]");
        }
        LoadingState::Success if view.cards.is_empty() => {
            let _ = writeln!(out, "{EMPTY_RESULTS}");
        }
        _ => out.push_str(&cards(&view.cards, show_category)),
    }
    out
}

pub fn dictionary(cards_view: &[CardView], show_category: bool) -> String {
    let mut out = format!("== আমার ডিকশনারি ({})\n", cards_view.len());
    if cards_view.is_empty() {
        let _ = writeln!(out, "{EMPTY_DICTIONARY}\n{EMPTY_DICTIONARY_HINT}");
    } else {
        out.push_str(&cards(cards_view, show_category));
    }
    out
}

pub fn cards(cards: &[CardView], show_category: bool) -> String {
    cards
        .iter()
        .enumerate()
        .map(|(i, card)| card_text(i + 1, card, show_category))
        .collect::<Vec<_>>()
        .join("\n")
}

fn card_text(index: usize, card: &CardView, show_category: bool) -> String {
    let entry = &card.entry;
    let mark = if card.saved { "★" } else { "☆" };

    let mut out = String::new();
    let _ = writeln!(
        out,
        "[{index}] {mark} {}  ({})",
        entry.arabic(),
        entry.transliteration()
    );
    let _ = writeln!(out, "    {}", entry.meaning());
    let _ = writeln!(out, "    গভীর অর্থ: {}", entry.nuance());
    let _ = writeln!(out, "    সূত্র: {}", entry.reference());
    if show_category && let Some(category) = entry.category() {
        let _ = writeln!(out, "    #{category}");
    }
    out
}

pub fn topics(suggested: &[String]) -> String {
    let mut out = String::from("জনপ্রিয় বিষয়:\n");
    for (i, topic) in suggested.iter().enumerate() {
        let _ = writeln!(out, "  {}. {topic}", i + 1);
    }
    out
}

pub fn speaker(role: ChatRole) -> &'static str {
    match role {
        ChatRole::User => "আপনি",
        ChatRole::Assistant => "অ্যাসিস্ট্যান্ট",
    }
}

pub fn message(message: &ChatMessage) -> String {
    format!("{}: {}", speaker(message.role), message.text)
}

pub fn transcript(messages: &[ChatMessage]) -> String {
    let mut out = String::from("== কোরআনিক অ্যাসিস্ট্যান্ট (AI দ্বারা চালিত)\n");
    for m in messages {
        let _ = writeln!(out, "{}", message(m));
    }
    out
}
