//! British and American quotation conventions
//!
//! British texts open dialog with single quotes and nest double quotes
//! inside; American texts do the reverse and also keep periods and commas
//! inside the closing quote.

/// Which quoting convention a text appears to follow
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuoteStyle {
    American,
    British,
    Unsure,
}

/// Count opening single quotes that are not apostrophes
fn count_single_openers(text: &str) -> usize {
    let mut previous: Option<char> = None;
    let mut count = 0;
    for c in text.chars() {
        if c == '‘' && !previous.is_some_and(char::is_alphanumeric) {
            count += 1;
        }
        previous = Some(c);
    }
    count
}

/// Guess the quoting convention by comparing opening quote counts
pub fn guess_quoting_style(xhtml: &str) -> QuoteStyle {
    let doubles = xhtml.chars().filter(|&c| c == '“').count();
    let singles = count_single_openers(xhtml);

    if doubles > singles {
        QuoteStyle::American
    } else if singles > doubles {
        QuoteStyle::British
    } else {
        QuoteStyle::Unsure
    }
}

// Private-use placeholders for converted closing quotes, so the punctuation
// pass only touches quotes this conversion produced.
const CLOSE_DOUBLE: char = '\u{E000}';
const CLOSE_SINGLE: char = '\u{E001}';

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Opener {
    /// A British double quote, now American single
    Double,
    /// A British single quote, now American double
    Single,
}

/// Convert British quotation to American quotation
///
/// Apostrophes (a `’` with no matching open single quote, or one followed by
/// a letter as in `’tis` or `don’t`) are left alone.
pub fn convert_british_to_american(xhtml: &str) -> String {
    let chars: Vec<char> = xhtml.chars().collect();
    let mut open: Vec<Opener> = Vec::new();
    let mut converted = String::with_capacity(xhtml.len());

    for (i, &c) in chars.iter().enumerate() {
        let previous = i.checked_sub(1).map(|p| chars[p]);
        let next = chars.get(i + 1).copied();

        match c {
            '“' => {
                open.push(Opener::Double);
                converted.push('‘');
            }
            '”' => {
                if let Some(position) = open.iter().rposition(|&o| o == Opener::Double) {
                    open.truncate(position);
                }
                converted.push(CLOSE_SINGLE);
            }
            '‘' if !previous.is_some_and(char::is_alphanumeric) => {
                open.push(Opener::Single);
                converted.push('“');
            }
            '’' if open.last() == Some(&Opener::Single)
                && !next.is_some_and(char::is_alphanumeric) =>
            {
                open.pop();
                converted.push(CLOSE_DOUBLE);
            }
            _ => converted.push(c),
        }
    }

    move_punctuation_inside(&converted)
}

/// Move a period or comma that follows a converted closing quote inside it
fn move_punctuation_inside(text: &str) -> String {
    let mut output = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        let close = match c {
            CLOSE_DOUBLE => '”',
            CLOSE_SINGLE => '’',
            _ => {
                output.push(c);
                continue;
            }
        };

        if let Some(&punctuation) = chars.peek()
            && matches!(punctuation, '.' | ',')
        {
            chars.next();
            output.push(punctuation);
        }
        output.push(close);
    }

    output
}
