pub mod sports_match;
