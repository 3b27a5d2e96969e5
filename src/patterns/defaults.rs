//! Built-in pattern banks.
//!
//! These are the tables used when no pattern file is configured, or for any
//! key a pattern file leaves out. Regex banks are matched case-insensitively
//! (each entry carries its own `(?i)` flag so a pattern file can opt out);
//! phrase lists are plain lowercase literals.

use crate::patterns::PatternSource;

/// Phrase-level boilerplate regexes, grouped by theme. Each match is replaced
/// by a single space.
pub const BOILERPLATE_PHRASES: &[&str] = &[
    // unsubscribe and preference centre
    r"(?i)\b(?:click|tap)\s+here\s+to\s+unsubscribe\b",
    r"(?i)\bif\s+you\s+(?:no\s+longer\s+)?(?:wish|want)\s+to\s+(?:receive|get)\s+(?:these|this|our|future)\s+(?:emails?|newsletters?|messages?|updates?)[^.!?]{0,120}[.!?]?",
    r"(?i)\bto\s+(?:stop\s+receiving|unsubscribe)\b[^.!?]{0,120}[.!?]?",
    r"(?i)\bunsubscribe\s+(?:here|now|instantly|from\s+(?:this|our|all)(?:\s+\w+){1,2})\b",
    r"(?i)\b(?:manage|update|change|edit)\s+(?:your\s+)?(?:email\s+)?(?:preferences|subscriptions?|settings)\b",
    r"(?i)\bopt[\s-]?out\b(?:\s+of\s+(?:these|all|future)\s+\w+)?",
    r"(?i)\bemail\s+preferences\b",
    r"(?i)\bunsubscribe\b",
    // why you are getting this
    r"(?i)\byou(?:'|’)?re\s+receiving\s+this\s+(?:email|message|newsletter)\b[^.!?]{0,160}[.!?]?",
    r"(?i)\byou\s+are\s+receiving\s+this\s+(?:email|message|newsletter)\b[^.!?]{0,160}[.!?]?",
    r"(?i)\bthis\s+(?:email|message|newsletter)\s+was\s+sent\s+to\s+\S+@\S+",
    r"(?i)\bsent\s+to\s+[\w.+-]+@[\w-]+(?:\.[\w-]+)+",
    r"(?i)\byou\s+(?:signed|subscribed)\s+up\s+(?:for|to)\b[^.!?]{0,120}[.!?]?",
    r"(?i)\bwhy\s+(?:am\s+i|did\s+i)\s+(?:get(?:ting)?|receiv(?:e|ing))\s+this\b\??",
    // privacy and legal
    r"(?i)\bprivacy\s+(?:policy|notice|statement)\b",
    r"(?i)\bterms\s+(?:of\s+(?:service|use)|and\s+conditions|&\s+conditions)\b",
    r"(?i)\bcookie\s+(?:policy|settings|preferences)\b",
    r"(?i)(?:©|\(c\)|\bcopyright)\s*(?:\d{4}\s*)?[\w.,&' -]{0,60}?\ball\s+rights\s+reserved\b\.?",
    r"(?i)\ball\s+rights\s+reserved\b\.?",
    r"(?i)©\s*(?:\d{4})?",
    r"(?i)\bcopyright\s+\d{4}\b",
    r"(?i)\bour\s+mailing\s+address\s+is\b:?",
    r"(?i)\bp\.?\s*o\.?\s+box\s+\d+\b",
    // view in browser
    r"(?i)\b(?:view|read|open)\s+(?:this\s+(?:email|newsletter|issue|message)\s+)?(?:in|on)\s+(?:your\s+|a\s+)?(?:web\s+)?browser\b",
    r"(?i)\b(?:having\s+)?trouble\s+viewing\s+this\s+(?:email|message)\b\??",
    r"(?i)\bview\s+(?:it\s+|this\s+email\s+)?online\b",
    r"(?i)\bweb\s+version\b",
    // social
    r"(?i)\bfollow\s+us\s+on\s+(?:twitter|x|facebook|linkedin|instagram|youtube|tiktok|threads|bluesky)(?:\s*(?:,|and|&)\s*(?:twitter|x|facebook|linkedin|instagram|youtube|tiktok|threads|bluesky))*\b",
    r"(?i)\bfollow\s+us\b",
    r"(?i)\b(?:connect|join)\s+(?:with\s+)?us\s+on\s+\w+\b",
    r"(?i)\b(?:like|find)\s+us\s+on\s+facebook\b",
    r"(?i)\bshare\s+(?:this\s+)?on\s+(?:twitter|x|facebook|linkedin)\b",
    // forwarding and sharing
    r"(?i)\bforward(?:ed)?\s+(?:this\s+)?(?:email|newsletter|issue)\s+to\s+a\s+(?:friend|colleague)\b",
    r"(?i)\bwas\s+this\s+(?:email\s+|newsletter\s+)?forwarded\s+to\s+you\b\??",
    r"(?i)\b(?:got|get)\s+this\s+from\s+a\s+friend\b\??",
    r"(?i)\bshare\s+(?:this\s+)?(?:newsletter|email|issue)\b(?:\s+with\s+(?:a\s+)?(?:friends?|colleagues?))?",
    r"(?i)\brefer\s+(?:a\s+)?friends?\b",
    // subscription and promotional calls to action
    r"(?i)\bsubscribe\s+(?:now|today|here|for\s+free)\b",
    r"(?i)\bsign\s+up\s+(?:here|now|today|for\s+free)\b",
    r"(?i)\bnot\s+(?:yet\s+)?(?:a\s+)?subscriber\b\??",
    r"(?i)\bupgrade\s+to\s+(?:paid|premium|pro)\b",
    r"(?i)\bbecome\s+a\s+(?:paid\s+)?(?:subscriber|member)\b",
    r"(?i)\badvertise\s+with\s+us\b",
    r"(?i)\bupdate\s+your\s+profile\b",
    r"(?i)\badd\s+us\s+to\s+your\s+(?:address\s+book|contacts|safe\s+senders?\s+list)\b",
    r"(?i)\bdownload\s+(?:the|our)\s+app\b",
    r"(?i)\bcontact\s+us\b",
    r"(?i)\bhelp\s+center\b",
];

/// Exact phrases removed when they stand alone as whole words.
pub const STANDALONE_PHRASES: &[&str] = &[
    "click here",
    "read more",
    "learn more",
    "see more",
    "find out more",
    "continue reading",
    "privacy policy",
    "terms of service",
    "terms of use",
    "view online",
    "view in browser",
    "manage preferences",
    "update preferences",
    "unsubscribe",
    "share this",
    "tweet this",
    "forward to a friend",
    "sign up",
    "subscribe",
    "advertise",
    "contact us",
    "open in app",
];

/// Anchor texts matching any of these are never relevant links.
pub const IRRELEVANT_LINKS: &[&str] = &[
    // generic calls to action
    r"(?i)^\W*(?:click|tap)\s+here\b",
    r"(?i)^\W*(?:read|learn|see|view|find\s+out)\s+more\W*$",
    r"(?i)^\W*(?:here|link|this|more|details|go|open)\W*$",
    r"(?i)^\W*(?:continue\s+reading|read\s+online|read\s+in\s+app|open\s+in\s+app)\W*$",
    // legal and footer
    r"(?i)\bunsubscribe\b",
    r"(?i)\b(?:manage|update|change|email)\s+(?:your\s+)?(?:preferences|subscriptions?|settings)\b",
    r"(?i)\bview\s+(?:in|this\s+(?:email|newsletter)\s+in)\s+(?:your\s+|a\s+)?browser\b",
    r"(?i)\bview\s+(?:it\s+|this\s+email\s+)?online\b",
    r"(?i)\bweb\s+version\b",
    r"(?i)\bprivacy\b",
    r"(?i)\bterms\s+(?:of|and|&)\b",
    r"(?i)\bcookie\s+(?:policy|settings)\b",
    r"(?i)\bcontact\s+us\b",
    r"(?i)\bhelp\s+center\b",
    r"(?i)\ball\s+rights\s+reserved\b",
    r"©",
    r"(?i)\b(?:advertise|sponsor)\s+(?:with|us)\b",
    // social networks
    r"(?i)^\W*(?:twitter|x|facebook|linkedin|instagram|youtube|tiktok|threads|reddit|mastodon|bluesky|discord|telegram|whatsapp|pinterest)\W*$",
    r"(?i)\bfollow\s+(?:us|me)\b",
    r"(?i)\bshare\s+(?:on|this|via)\b",
    r"(?i)^\W*(?:share|tweet|like|comment|reply|forward|repost)\W*$",
    r"(?i)\bforward\s+to\s+a\s+friend\b",
    r"(?i)\brefer\s+(?:a\s+)?friends?\b",
    r"(?i)\b(?:subscribe|sign\s+up|sign\s+in|log\s+in|login|register)\b",
    r"(?i)\bupgrade\s+(?:to|your)\b",
    r"(?i)\b(?:download|get)\s+(?:the|our)\s+app\b",
    r"(?i)\b(?:app\s+store|google\s+play)\b",
    r"(?i)\bview\s+(?:all|the\s+archive|archive|past\s+issues)\b",
    // engagement and surveys
    r"(?i)\b(?:take|fill\s+out|complete)\s+(?:our|the|a|this)\s+(?:short\s+|quick\s+)?survey\b",
    r"(?i)\b(?:give|share|leave|send)\s+(?:us\s+)?(?:your\s+)?feedback\b",
    r"(?i)\bhow\s+(?:did\s+we\s+do|was\s+(?:this|today(?:'|’)?s)\s+(?:email|issue|newsletter))\b",
    r"(?i)\brate\s+(?:this|today(?:'|’)?s)\b",
    r"(?i)^\W*(?:loved\s+it|it\s+was\s+ok|not\s+great|great|good|meh|bad)\W*$",
    // emoji-only reactions
    r"^[\p{Extended_Pictographic}\x{FE0F}\x{200D}\s]+$",
];

/// Anchor texts matching any of these are kept after the irrelevant pass.
pub const RELEVANT_LINKS: &[&str] = &[
    // content nouns
    r"(?i)\b(?:article|report|research|study|studies|paper|analysis|whitepaper|white\s+paper|case\s+study|guide|tutorial|podcast|episode|interview|essay|deep\s+dive|breakdown|benchmark|dataset|announcement|findings|survey\s+results?|explainer|op-ed|editorial)\b",
    // news verbs
    r"(?i)\b(?:launch(?:es|ed)?|release[sd]?|unveil(?:s|ed)?|announce[sd]?|raises?|raised|acquires?|acquired|acquisition|partners?\s+with|open[- ]sources?d?)\b",
    // companies
    r"(?i)\b(?:openai|anthropic|google|alphabet|deepmind|microsoft|meta|apple|amazon|aws|nvidia|amd|intel|arm|tsmc|qualcomm|tesla|spacex|xai|ibm|oracle|salesforce|adobe|hugging\s*face|mistral|cohere|stability\s+ai|perplexity|databricks|snowflake|scale\s+ai|palantir|github|gitlab|stripe|shopify|netflix|uber|airbnb|bytedance|baidu|alibaba|tencent|samsung|sony)\b",
    // products and technologies
    r"(?i)\b(?:chatgpt|gpt-?\d(?:\.\d)?o?|claude|gemini|llama|copilot|midjourney|dall-?e|sora|whisper|bert|stable\s+diffusion|kubernetes|docker|rust|python|typescript|javascript|webassembly|postgres(?:ql)?|react|linux|cuda|pytorch|tensorflow|langchain)\b",
    // AI and ML terminology
    r"(?i)\b(?:ai|artificial\s+intelligence|machine\s+learning|deep\s+learning|llms?|large\s+language\s+models?|neural\s+net(?:work)?s?|transformers?|agents?|agentic|rag|retrieval|fine-?tun(?:e|ed|ing)|inference|training|gpus?|embeddings?|multimodal|reasoning|alignment|diffusion|generative|genai|robotics|automation)\b",
    // role titles
    r"(?i)\b(?:ceo|cto|cfo|coo|founders?|co-?founders?|engineers?|researchers?|scientists?|director|vp|vice\s+president|head\s+of|product\s+managers?|investors?|analysts?|hiring)\b",
    // event types
    r"(?i)\b(?:conference|summit|webinar|meetup|workshop|keynote|hackathon|demo\s+day|panel|livestream|talk|fireside\s+chat)\b",
    // market terminology
    r"(?i)\b(?:ipo|valuation|revenue|earnings|markets?|stocks?|shares|venture|vc|series\s+[a-f]|seed\s+round|funding(?:\s+round)?|m&a|startups?|unicorn|layoffs?|regulation|antitrust|policy\s+brief|tariffs?)\b",
];

/// Substantive-looking anchor texts that are still boilerplate.
pub const GENERIC_LINK_PHRASES: &[&str] = &[
    "read the full story",
    "read the full article",
    "read the full post",
    "click here to read",
    "click here to learn more",
    "view this email in your browser",
    "read more here",
    "learn more here",
    "see what's new",
    "find out more here",
    "read online version",
    "view online version",
    "see all the details",
    "check it out here",
    "get the full story",
];

/// Lexical hints that a block holds the main body of a newsletter.
pub const CONTENT_INDICATORS: &[&str] = &[
    "key insights",
    "key takeaways",
    "according to",
    "announced",
    "launched",
    "released",
    "raised",
    "funding",
    "research",
    "study",
    "report",
    "analysis",
    "found that",
    "shows that",
    "in other news",
    "this week",
    "today's",
    "top stories",
    "percent",
    "million",
    "billion",
    "why it matters",
    "the big picture",
    "what happened",
];

/// Lexical hints that a block is footer or promotional furniture.
pub const BOILERPLATE_INDICATORS: &[&str] = &[
    "unsubscribe",
    "privacy policy",
    "terms of service",
    "terms of use",
    "all rights reserved",
    "view in browser",
    "view this email",
    "view online",
    "manage preferences",
    "email preferences",
    "update your preferences",
    "you are receiving",
    "you're receiving",
    "you received this",
    "follow us",
    "forward this",
    "copyright",
    "mailing address",
    "opt out",
    "opt-out",
    "no longer wish",
    "add us to your address book",
    "advertise with us",
    "sponsored by",
];

/// Class and id tokens that mark structural noise for the removal pass.
pub const NOISE_MARKERS: &[&str] = &[
    "footer",
    "header",
    "nav",
    "navbar",
    "navigation",
    "menu",
    "unsubscribe",
    "social",
    "share",
    "sharing",
    "preference",
    "preferences",
    "prefcenter",
    "legal",
    "copyright",
    "disclaimer",
    "sponsor",
    "sponsored",
    "advert",
    "advertisement",
    "tracking",
    "preheader",
];

/// Class or id fragments that raise an element's readability score.
pub const POSITIVE_NAMES: &[&str] = &[
    "article", "body", "content", "entry", "hentry", "main", "page", "post", "text", "blog",
    "story", "newsletter", "issue",
];

/// Class or id fragments that lower an element's readability score.
pub const NEGATIVE_NAMES: &[&str] = &[
    "combx",
    "comment",
    "contact",
    "foot",
    "footnote",
    "masthead",
    "media",
    "meta",
    "outbrain",
    "promo",
    "related",
    "scroll",
    "shoutbox",
    "sidebar",
    "sponsor",
    "shopping",
    "tags",
    "tool",
    "widget",
    "nav",
    "banner",
    "advert",
    "social",
    "share",
    "unsubscribe",
    "preference",
];

fn owned(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

pub fn source() -> PatternSource {
    PatternSource {
        boilerplate_phrases: owned(BOILERPLATE_PHRASES),
        standalone_phrases: owned(STANDALONE_PHRASES),
        irrelevant_links: owned(IRRELEVANT_LINKS),
        relevant_links: owned(RELEVANT_LINKS),
        generic_link_phrases: owned(GENERIC_LINK_PHRASES),
        content_indicators: owned(CONTENT_INDICATORS),
        boilerplate_indicators: owned(BOILERPLATE_INDICATORS),
        noise_markers: owned(NOISE_MARKERS),
        positive_names: owned(POSITIVE_NAMES),
        negative_names: owned(NEGATIVE_NAMES),
    }
}
