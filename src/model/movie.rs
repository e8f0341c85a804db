use chrono::Datelike;
use thiserror::Error;

// Nothing was filmed before Roundhay Garden Scene.
const MIN_YEAR: i32 = 1888;

/// A field-level failure while turning a catalog line into a [`Movie`].
/// Checks run in field order and the first violated rule wins.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    #[error("expected 7 fields but found {0}")]
    FieldCount(usize),
    #[error("title is empty")]
    EmptyTitle,
    #[error("year is not a valid integer: '{0}'")]
    YearNotInteger(String),
    #[error("year must be between 1888 and {0}")]
    YearOutOfRange(i32),
    #[error("director is empty")]
    EmptyDirector,
    #[error("rating is not a valid number: '{0}'")]
    RatingNotNumber(String),
    #[error("rating must be between 0.0 and 10.0")]
    RatingOutOfRange,
    #[error("runtime is not a valid integer: '{0}'")]
    RuntimeNotInteger(String),
    #[error("runtime must be a positive integer")]
    RuntimeNotPositive,
    #[error("votes is not a valid integer: '{0}'")]
    VotesNotInteger(String),
    #[error("votes must be 0 or greater")]
    VotesNegative,
    #[error("watched must be true/false, yes/no, or 1/0: '{0}'")]
    WatchedUnrecognized(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Movie {
    pub title: String,
    pub year: i32,
    pub director: String,
    pub rating: f64,
    pub runtime_minutes: i32,
    pub votes: i32,
    pub watched: bool,
}

impl Movie {
    pub fn csv_header() -> Vec<&'static str> {
        vec![
            "title",
            "year",
            "director",
            "rating",
            "runtimeMinutes",
            "votes",
            "watched",
        ]
    }

    /// Decodes one comma-separated catalog line. Empty fields are kept, so a
    /// line like `,,,,,,` still reaches the per-field checks.
    pub fn from_line(line: &str) -> Result<Movie, ParseError> {
        let fields: Vec<&str> = line.split(',').collect();
        Movie::from_fields(&fields)
    }

    /// Validates a full field set as a unit and constructs the movie, or
    /// fails on the first bad field. A movie is never partially built.
    pub fn from_fields(fields: &[&str]) -> Result<Movie, ParseError> {
        if fields.len() != 7 {
            return Err(ParseError::FieldCount(fields.len()));
        }

        let title = fields[0].trim();
        if title.is_empty() {
            return Err(ParseError::EmptyTitle);
        }

        let year_text = fields[1].trim();
        let year: i32 = year_text
            .parse()
            .map_err(|_| ParseError::YearNotInteger(year_text.to_string()))?;
        let newest = current_year();
        if !(MIN_YEAR..=newest).contains(&year) {
            return Err(ParseError::YearOutOfRange(newest));
        }

        let director = fields[2].trim();
        if director.is_empty() {
            return Err(ParseError::EmptyDirector);
        }

        let rating_text = fields[3].trim();
        let rating: f64 = rating_text
            .parse()
            .map_err(|_| ParseError::RatingNotNumber(rating_text.to_string()))?;
        if !(0.0..=10.0).contains(&rating) {
            return Err(ParseError::RatingOutOfRange);
        }

        let runtime_text = fields[4].trim();
        let runtime_minutes: i32 = runtime_text
            .parse()
            .map_err(|_| ParseError::RuntimeNotInteger(runtime_text.to_string()))?;
        if runtime_minutes <= 0 {
            return Err(ParseError::RuntimeNotPositive);
        }

        let votes_text = fields[5].trim();
        let votes: i32 = votes_text
            .parse()
            .map_err(|_| ParseError::VotesNotInteger(votes_text.to_string()))?;
        if votes < 0 {
            return Err(ParseError::VotesNegative);
        }

        let watched_text = fields[6].trim();
        let watched = match watched_text.to_ascii_lowercase().as_str() {
            "true" | "yes" | "y" | "1" => true,
            "false" | "no" | "n" | "0" => false,
            _ => return Err(ParseError::WatchedUnrecognized(watched_text.to_string())),
        };

        Ok(Movie {
            title: title.to_string(),
            year,
            director: director.to_string(),
            rating,
            runtime_minutes,
            votes,
            watched,
        })
    }

    pub fn to_fields(&self) -> Vec<String> {
        vec![
            self.title.clone(),
            self.year.to_string(),
            self.director.clone(),
            format!("{:.1}", self.rating),
            self.runtime_minutes.to_string(),
            self.votes.to_string(),
            self.watched.to_string(),
        ]
    }

    pub fn to_line(&self) -> String {
        self.to_fields().join(",")
    }

    /// Scariness score in [0.0, 10.0], computed on demand and never stored.
    pub fn scariness(&self) -> f64 {
        let mut score = self.rating;
        score += (f64::from(self.votes) / 500_000.0).min(2.0); // max +2 from votes
        if self.runtime_minutes > 120 {
            score += 1.0; // longer movies are scarier
        }
        if self.watched {
            score -= 1.0; // seen movies are less scary
        }
        score.clamp(0.0, 10.0)
    }

    pub fn summary(&self) -> String {
        format!(
            "{} ({}) - dir: {} | rating {:.1} | {} min | {} votes | watched: {}",
            self.title,
            self.year,
            self.director,
            self.rating,
            self.runtime_minutes,
            self.votes,
            if self.watched { "yes" } else { "no" }
        )
    }
}

fn current_year() -> i32 {
    chrono::Local::now().year()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shining() -> Movie {
        Movie {
            title: "The Shining".to_string(),
            year: 1980,
            director: "Stanley Kubrick".to_string(),
            rating: 8.4,
            runtime_minutes: 146,
            votes: 1_100_000,
            watched: true,
        }
    }

    #[test]
    fn decodes_a_well_formed_line() {
        let movie =
            Movie::from_line("The Shining,1980,Stanley Kubrick,8.4,146,1100000,true").unwrap();
        assert_eq!(movie, shining());
    }

    #[test]
    fn decode_trims_whitespace_per_field() {
        let movie =
            Movie::from_line(" The Shining , 1980 ,Stanley Kubrick, 8.4 , 146 ,1100000, true ")
                .unwrap();
        assert_eq!(movie, shining());
    }

    #[test]
    fn encode_then_decode_is_identity() {
        let movie = shining();
        assert_eq!(Movie::from_line(&movie.to_line()).unwrap(), movie);
    }

    #[test]
    fn encode_uses_one_fractional_digit_and_lowercase_watched() {
        assert_eq!(
            shining().to_line(),
            "The Shining,1980,Stanley Kubrick,8.4,146,1100000,true"
        );

        let mut unseen = shining();
        unseen.rating = 9.0;
        unseen.watched = false;
        assert_eq!(
            unseen.to_line(),
            "The Shining,1980,Stanley Kubrick,9.0,146,1100000,false"
        );
    }

    #[test]
    fn rejects_wrong_field_count() {
        assert_eq!(
            Movie::from_line("only,three,fields"),
            Err(ParseError::FieldCount(3))
        );
        assert_eq!(Movie::from_line(""), Err(ParseError::FieldCount(1)));
    }

    #[test]
    fn rejects_empty_title() {
        assert_eq!(
            Movie::from_line("  ,1980,Stanley Kubrick,8.4,146,1100000,true"),
            Err(ParseError::EmptyTitle)
        );
    }

    #[test]
    fn rejects_year_that_does_not_parse() {
        let err = Movie::from_line("Bad,abcd,X,5,90,10,no").unwrap_err();
        assert_eq!(err, ParseError::YearNotInteger("abcd".to_string()));
        assert!(err.to_string().contains("'abcd'"));
    }

    #[test]
    fn rejects_year_out_of_range() {
        assert!(matches!(
            Movie::from_line("Old,1887,X,5,90,10,no"),
            Err(ParseError::YearOutOfRange(_))
        ));
        assert!(matches!(
            Movie::from_line("Future,3000,X,5,90,10,no"),
            Err(ParseError::YearOutOfRange(_))
        ));
    }

    #[test]
    fn rejects_empty_director() {
        assert_eq!(
            Movie::from_line("Bad,1980, ,5,90,10,no"),
            Err(ParseError::EmptyDirector)
        );
    }

    #[test]
    fn rejects_bad_rating() {
        assert_eq!(
            Movie::from_line("Bad,1980,X,great,90,10,no"),
            Err(ParseError::RatingNotNumber("great".to_string()))
        );
        assert_eq!(
            Movie::from_line("Bad,1980,X,10.5,90,10,no"),
            Err(ParseError::RatingOutOfRange)
        );
        assert_eq!(
            Movie::from_line("Bad,1980,X,-0.1,90,10,no"),
            Err(ParseError::RatingOutOfRange)
        );
    }

    #[test]
    fn rejects_bad_runtime() {
        assert_eq!(
            Movie::from_line("Bad,1980,X,5,short,10,no"),
            Err(ParseError::RuntimeNotInteger("short".to_string()))
        );
        assert_eq!(
            Movie::from_line("Bad,1980,X,5,0,10,no"),
            Err(ParseError::RuntimeNotPositive)
        );
        assert_eq!(
            Movie::from_line("Bad,1980,X,5,-90,10,no"),
            Err(ParseError::RuntimeNotPositive)
        );
    }

    #[test]
    fn rejects_bad_votes() {
        assert_eq!(
            Movie::from_line("Bad,1980,X,5,90,many,no"),
            Err(ParseError::VotesNotInteger("many".to_string()))
        );
        assert_eq!(
            Movie::from_line("Bad,1980,X,5,90,-1,no"),
            Err(ParseError::VotesNegative)
        );
    }

    #[test]
    fn watched_accepts_the_full_vocabulary() {
        for token in ["true", "TRUE", "yes", "Yes", "y", "1"] {
            let line = format!("Alien,1979,Ridley Scott,8.5,117,900000,{}", token);
            assert!(Movie::from_line(&line).unwrap().watched, "token {}", token);
        }
        for token in ["false", "FALSE", "no", "No", "n", "0"] {
            let line = format!("Alien,1979,Ridley Scott,8.5,117,900000,{}", token);
            assert!(!Movie::from_line(&line).unwrap().watched, "token {}", token);
        }
    }

    #[test]
    fn rejects_unknown_watched_token() {
        let err = Movie::from_line("Bad,1980,X,5,90,10,maybe").unwrap_err();
        assert_eq!(err, ParseError::WatchedUnrecognized("maybe".to_string()));
    }

    #[test]
    fn first_violated_rule_wins() {
        // Both the year and the votes are bad; the year is reported.
        assert!(matches!(
            Movie::from_line("Bad,abcd,X,5,90,-1,no"),
            Err(ParseError::YearNotInteger(_))
        ));
    }

    #[test]
    fn scariness_of_the_shining_clamps_to_ten() {
        // 8.4 + 2.0 (votes capped) + 1.0 (146 min) - 1.0 (watched) = 10.4
        assert_eq!(shining().scariness(), 10.0);
    }

    #[test]
    fn scariness_never_drops_below_zero() {
        let dull = Movie {
            title: "Dull".to_string(),
            year: 2000,
            director: "Nobody".to_string(),
            rating: 0.0,
            runtime_minutes: 90,
            votes: 0,
            watched: true,
        };
        assert_eq!(dull.scariness(), 0.0);
    }

    #[test]
    fn scariness_adds_vote_weight_below_the_cap() {
        let movie = Movie {
            title: "Mid".to_string(),
            year: 2000,
            director: "Someone".to_string(),
            rating: 5.0,
            runtime_minutes: 100,
            votes: 250_000,
            watched: false,
        };
        assert_eq!(movie.scariness(), 5.5);
    }
}
