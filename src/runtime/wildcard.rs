use crate::config::CaseSensitivity;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Token {
    Star,
    QMark,
    Literal(char),
}

/// Glob over whole strings: `?` matches one character, `*` any run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlobPattern {
    tokens: Vec<Token>,
    case: CaseSensitivity,
}

impl GlobPattern {
    pub fn new(pattern: &str, case: CaseSensitivity) -> Self {
        let mut tokens = Vec::with_capacity(pattern.len());
        for c in pattern.chars() {
            let token = match c {
                '*' => Token::Star,
                '?' => Token::QMark,
                other => Token::Literal(other),
            };
            // Runs of stars are equivalent to one.
            if token == Token::Star && tokens.last() == Some(&Token::Star) {
                continue;
            }
            tokens.push(token);
        }
        Self { tokens, case }
    }

    pub fn matches(&self, text: &str) -> bool {
        let text: Vec<char> = text.chars().collect();
        let pattern = &self.tokens;
        let mut pi = 0usize;
        let mut ti = 0usize;
        let mut star: Option<usize> = None;
        let mut star_text = 0usize;

        while ti < text.len() {
            if pi < pattern.len() {
                match pattern[pi] {
                    Token::Literal(c) if self.case.chars_equal(c, text[ti]) => {
                        pi += 1;
                        ti += 1;
                        continue;
                    }
                    Token::QMark => {
                        pi += 1;
                        ti += 1;
                        continue;
                    }
                    Token::Star => {
                        star = Some(pi);
                        pi += 1;
                        star_text = ti;
                        continue;
                    }
                    Token::Literal(_) => {}
                }
            }

            // Mismatch: let the last star absorb one more character.
            match star {
                Some(star_pos) => {
                    pi = star_pos + 1;
                    star_text += 1;
                    ti = star_text;
                }
                None => return false,
            }
        }

        pattern[pi..].iter().all(|t| *t == Token::Star)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn glob(p: &str) -> GlobPattern {
        GlobPattern::new(p, CaseSensitivity::Sensitive)
    }

    #[test]
    fn question_mark_is_one_char() {
        assert!(glob("1?3.5").matches("123.5"));
        assert!(!glob("1?3.5").matches("13.5"));
        assert!(!glob("1?3.5").matches("1223.5"));
    }

    #[test]
    fn star_is_any_run() {
        assert!(glob("1*5").matches("1234.5"));
        assert!(glob("1*5").matches("15"));
        assert!(glob("*").matches(""));
        assert!(glob("a**b").matches("ab"));
        assert!(!glob("x*").matches("123.5"));
        assert!(!glob("1*4").matches("1234.5"));
    }

    #[test]
    fn case_policy_is_respected() {
        assert!(!glob("ab*").matches("ABC"));
        assert!(GlobPattern::new("ab*", CaseSensitivity::Insensitive).matches("ABC"));
        assert!(GlobPattern::new("é?", CaseSensitivity::Insensitive).matches("Éa"));
    }

    #[test]
    fn backtracks_across_repeated_prefixes() {
        assert!(glob("*aab").matches("aaaab"));
        assert!(glob("a*b*c").matches("axxbyybzc"));
        assert!(!glob("a*b*c").matches("axxbyyb"));
    }
}
