use rand::seq::IndexedRandom;

const INSPIRATIONAL_QUOTES: &[&str] = &[
    "The only way to do great work is to love what you do. - Steve Jobs",
    "Success is not final, failure is not fatal: it is the courage to continue that counts. - Winston Churchill",
    "Believe you can and you're halfway there. - Theodore Roosevelt",
    "It is during our darkest moments that we must focus to see the light. - Aristotle",
    "The future belongs to those who believe in the beauty of their dreams. - Eleanor Roosevelt",
    "It is never too late to be what you might have been. - George Eliot",
    "The way to get started is to quit talking and begin doing. - Walt Disney",
    "Don't let yesterday take up too much of today. - Will Rogers",
    "You learn more from failure than from success. Don't let it stop you. Failure builds character. - Unknown",
    "If you are working on something that you really care about, you don't have to be pushed. The vision pulls you. - Steve Jobs",
    "People who are crazy enough to think they can change the world, are the ones who do. - Rob Siltanen",
    "We don't make mistakes, just happy little accidents. - Bob Ross",
    "Failure is the condiment that gives success its flavor. - Truman Capote",
    "The only impossible journey is the one you never begin. - Tony Robbins",
    "In the midst of winter, I found there was, within me, an invincible summer. - Albert Camus",
    "What lies behind us and what lies before us are tiny matters compared to what lies within us. - Ralph Waldo Emerson",
    "Success is walking from failure to failure with no loss of enthusiasm. - Winston Churchill",
    "Try not to become a person of success, but rather try to become a person of value. - Albert Einstein",
    "Great things never come from comfort zones. - Anonymous",
    "Dream big and dare to fail. - Norman Vaughan",
];

// Fixed, read-only quote list - shared by every request without locking
#[derive(Debug, Clone, Copy)]
pub struct QuoteProvider {
    quotes: &'static [&'static str],
}

impl Default for QuoteProvider {
    fn default() -> Self {
        Self {
            quotes: INSPIRATIONAL_QUOTES,
        }
    }
}

impl QuoteProvider {
    // Build over a custom list, falls back to the built-in one when empty
    pub fn with_quotes(quotes: &'static [&'static str]) -> Self {
        if quotes.is_empty() {
            return Self::default();
        }
        Self { quotes }
    }

    pub fn random_quote(&self) -> &'static str {
        self.quotes
            .choose(&mut rand::rng())
            .copied()
            .unwrap_or(INSPIRATIONAL_QUOTES[0])
    }

    pub fn quote_count(&self) -> usize {
        self.quotes.len()
    }
}
