use nuance_types::WordEntry;

/// Topic shown before the first search
pub const DEFAULT_TOPIC: &str = "মানব সৃষ্টি";

pub const SUGGESTED_TOPICS: [&str; 5] = [
    "হৃদয় (Heart)",
    "জ্ঞান (Knowledge)",
    "ধৈর্য (Patience)",
    "বিশ্বাস (Iman)",
    "সময় (Time)",
];

/// Built-in cards for the default topic
pub fn default_words() -> [WordEntry; 3] {
    [
        WordEntry::new(
            "الْإِنْسَانُ",
            "আল-ইনসান",
            "মানুষ (বিস্মৃতিপ্রবণ)",
            "যে ভুলে যায়, যে ভীত-চিন্তিত থাকে, যে সামাজিক জীব। এই শব্দটি মানুষের মনস্তাত্ত্বিক দুর্বলতা এবং সামাজিক নির্ভরতা প্রকাশ করে।",
            "সূরা আল-হাশর ৫৯:১৯",
        )
        .with_category("Humanity"),
        WordEntry::new(
            "بَشَرٌ",
            "বাশার",
            "মানুষ (শারীরিক)",
            "যার চামড়া আছে, যাকে ছোঁয়া যায়, যে দৃশ্যমান। এই শব্দটি মানুষের জৈবিক ও শারীরিক দিকটি (যেমন খাওয়া, পান করা, মরণশীলতা) নির্দেশ করে।",
            "সূরা আল-হিজর ১৫:২৬",
        )
        .with_category("Humanity"),
        WordEntry::new(
            "بَنِي آدَمَ",
            "বনী আদম",
            "আদমের সন্তান",
            "আদমের সন্তান হিসেবে মানুষের মর্যাদা, একই বাবার পরিবার এবং একই রক্তের ভাই-বোন হিসেবে ভ্রাতৃত্ববোধ ও সম্মানের প্রতীক।",
            "সূরা আল-ইসরা ১৭:৭০",
        )
        .with_category("Humanity"),
    ]
}

/// Drop a parenthesized annotation from a suggestion label:
/// `"Heart (হৃদয়)"` becomes `"Heart"`.
pub fn clean_topic(label: &str) -> &str {
    label.split('(').next().unwrap_or(label).trim()
}
