//! Historical and alternate country names seen in public datasets, mapped to
//! the canonical catalog name. Matching is case- and accent-insensitive, so
//! only spelling variants need listing here (not `"Côte d'Ivoire"`).

pub(crate) const NAME_ALIASES: &[(&str, &str)] = &[
    ("Antigua and Barb.", "Antigua and Barbuda"),
    ("The Bahamas", "Bahamas"),
    ("Bahamas, The", "Bahamas"),
    ("Bolivia (Plurinational State of)", "Bolivia"),
    ("Plurinational State of Bolivia", "Bolivia"),
    ("Bosnia and Herz.", "Bosnia and Herzegovina"),
    ("Bosnia-Herzegovina", "Bosnia and Herzegovina"),
    ("Brunei Darussalam", "Brunei"),
    ("Cape Verde", "Cabo Verde"),
    ("Central African Rep.", "Central African Republic"),
    ("Ivory Coast", "Cote d'Ivoire"),
    ("Czech Republic", "Czechia"),
    ("Czech Rep.", "Czechia"),
    ("Dem. Rep. Congo", "Democratic Republic of the Congo"),
    ("DR Congo", "Democratic Republic of the Congo"),
    ("DRC", "Democratic Republic of the Congo"),
    ("Congo (Kinshasa)", "Democratic Republic of the Congo"),
    ("Congo, Dem. Rep.", "Democratic Republic of the Congo"),
    ("Zaire", "Democratic Republic of the Congo"),
    ("Dominican Rep.", "Dominican Republic"),
    ("Eq. Guinea", "Equatorial Guinea"),
    ("Swaziland", "Eswatini"),
    ("Kingdom of eSwatini", "Eswatini"),
    ("The Gambia", "Gambia"),
    ("Gambia, The", "Gambia"),
    ("Guinea Bissau", "Guinea-Bissau"),
    ("Iran, Islamic Republic of", "Iran"),
    ("Iran (Islamic Republic of)", "Iran"),
    ("Islamic Republic of Iran", "Iran"),
    ("Lao PDR", "Laos"),
    ("Lao People's Democratic Republic", "Laos"),
    ("Micronesia (Federated States of)", "Micronesia"),
    ("Federated States of Micronesia", "Micronesia"),
    ("Micronesia, Fed. Sts.", "Micronesia"),
    ("Marshall Is.", "Marshall Islands"),
    ("Republic of Moldova", "Moldova"),
    ("Moldova, Republic of", "Moldova"),
    ("Burma", "Myanmar"),
    ("The Netherlands", "Netherlands"),
    ("Holland", "Netherlands"),
    ("Dem. Rep. Korea", "North Korea"),
    ("Democratic People's Republic of Korea", "North Korea"),
    ("Korea, Dem. People's Rep.", "North Korea"),
    ("Korea, North", "North Korea"),
    ("Macedonia", "North Macedonia"),
    ("Republic of North Macedonia", "North Macedonia"),
    ("Former Yugoslav Republic of Macedonia", "North Macedonia"),
    ("State of Palestine", "Palestine"),
    ("Palestinian Territories", "Palestine"),
    ("Palestine, State of", "Palestine"),
    ("Congo", "Republic of the Congo"),
    ("Congo (Brazzaville)", "Republic of the Congo"),
    ("Congo, Rep.", "Republic of the Congo"),
    ("Russian Federation", "Russia"),
    ("St. Kitts and Nevis", "Saint Kitts and Nevis"),
    ("St. Lucia", "Saint Lucia"),
    ("St. Vincent and the Grenadines", "Saint Vincent and the Grenadines"),
    ("St. Vin. and Gren.", "Saint Vincent and the Grenadines"),
    ("Republic of Serbia", "Serbia"),
    ("Solomon Is.", "Solomon Islands"),
    ("Republic of Korea", "South Korea"),
    ("Korea, Republic of", "South Korea"),
    ("Korea, Rep.", "South Korea"),
    ("Korea", "South Korea"),
    ("S. Sudan", "South Sudan"),
    ("Syrian Arab Republic", "Syria"),
    ("United Republic of Tanzania", "Tanzania"),
    ("Tanzania, United Republic of", "Tanzania"),
    ("East Timor", "Timor-Leste"),
    ("Trinidad & Tobago", "Trinidad and Tobago"),
    ("Türkiye", "Turkey"),
    ("Republic of Türkiye", "Turkey"),
    ("UAE", "United Arab Emirates"),
    ("UK", "United Kingdom"),
    ("Great Britain", "United Kingdom"),
    ("United Kingdom of Great Britain and Northern Ireland", "United Kingdom"),
    ("United States of America", "United States"),
    ("USA", "United States"),
    ("U.S.A.", "United States"),
    ("Holy See", "Vatican City"),
    ("Holy See (Vatican City State)", "Vatican City"),
    ("Vatican", "Vatican City"),
    ("Venezuela (Bolivarian Republic of)", "Venezuela"),
    ("Bolivarian Republic of Venezuela", "Venezuela"),
    ("Viet Nam", "Vietnam"),
    ("Yemen, Rep.", "Yemen"),
];
