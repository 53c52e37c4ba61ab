use lazy_static::lazy_static;

lazy_static! {
    pub static ref STOP_WORDS: Vec<&'static str> = vec![
        "the", "a", "an", "and", "or", "of", "for", "to", "in", "on", "is", "are",
        "your", "you", "me", "my", "we", "us", "our", "with", "at", "as", "by",
        "please", "enter", "provide", "select", "choose", "from",
    ];
}

lazy_static! {
    // Ordered: the table is walked in this order when building a lexicon.
    pub static ref SYNONYM_TABLE: Vec<(&'static str, Vec<&'static str>)> = vec![
        ("name", vec!["fullname", "full", "first", "last", "surname", "given", "middle"]),
        ("email", vec!["mail", "e-mail", "gmail", "outlook"]),
        ("phone", vec!["mobile", "telephone", "tel", "contact", "whatsapp", "cell", "number", "no"]),
        ("address", vec![
            "addr", "location", "street", "st", "city", "state", "province",
            "zip", "zipcode", "postcode", "pincode", "country",
        ]),
        ("date", vec!["dob", "birth", "birthday", "day", "month", "year"]),
        ("college", vec!["university", "school", "institute", "campus"]),
        ("degree", vec!["qualification", "education", "course", "program", "major"]),
        ("company", vec![
            "organization", "organisation", "employer", "workplace", "firm", "corp", "corporation",
        ]),
        ("role", vec!["position", "title", "job", "designation"]),
        ("experience", vec!["exp", "years", "yoe", "workexp"]),
        ("gpa", vec!["cgpa", "grade", "score"]),
        ("github", vec!["git", "gh", "repository", "repo", "username", "handle"]),
        ("linkedin", vec!["linkdin", "profile", "li"]),
        ("website", vec!["portfolio", "site", "url", "link"]),
        ("gender", vec!["sex"]),
        ("nationality", vec!["citizenship"]),
    ];
}

lazy_static! {
    pub static ref TYPE_HINT_PATTERNS: Vec<(&'static str, &'static str)> = vec![
        ("email", r"(email|e\s?mail)"),
        ("phone", r"(phone|mobile|tel|whatsapp|contact)"),
        ("date", r"(dob|birth|date)"),
        ("github", r"(github|git)"),
        ("linkedin", r"(linkedin)"),
        ("url", r"(portfolio|website|site|url|link)"),
        ("postal", r"(zip|zipcode|postcode|pincode)"),
    ];
}
