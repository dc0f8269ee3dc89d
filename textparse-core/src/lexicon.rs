//! Listas embutidas do modelo `en_core_crf`: nomes de pessoas, organizações,
//! entidades geopolíticas e locais, com foco no Reino Unido.

pub const PERSONS: &[&str] = &[
    "James", "John", "Robert", "Michael", "William", "David", "Richard", "Thomas",
    "Charles", "Daniel", "Matthew", "George", "Oliver", "Harry", "Jack", "Alfie",
    "Mary", "Elizabeth", "Sarah", "Emma", "Olivia", "Amelia", "Sophie", "Jessica",
    "Charlotte", "Emily", "Grace", "Hannah", "Priya", "Aisha", "Mohammed", "Raj",
    "Smith", "Jones", "Taylor", "Brown", "Williams", "Wilson", "Johnson", "Davies",
    "Evans", "Thompson", "Walker", "Wright", "Robinson", "Patel", "Khan", "Singh",
];

pub const ORGANIZATIONS: &[&str] = &[
    "Tesco", "Sainsbury's", "Asda", "Morrisons", "Waitrose", "Marks and Spencer",
    "Barclays", "HSBC", "Lloyds", "NatWest", "Santander", "Nationwide",
    "BBC", "NHS", "HMRC", "Companies House", "Ofsted", "Royal Mail",
    "Costa Coffee", "Greggs", "Pret A Manger", "Starbucks", "McDonald's",
    "Rightmove", "Zoopla", "Google", "Amazon", "Apple", "Microsoft",
    "Manchester United", "Bank of England", "London Stock Exchange",
];

pub const GPES: &[&str] = &[
    "United Kingdom", "UK", "Britain", "Great Britain", "England", "Scotland",
    "Wales", "Northern Ireland", "Ireland", "France", "Germany", "Spain", "Italy",
    "United States", "USA", "London", "Manchester", "Birmingham", "Leeds",
    "Glasgow", "Edinburgh", "Liverpool", "Bristol", "Sheffield", "Cardiff",
    "Belfast", "Newcastle", "Nottingham", "Leicester", "Southampton", "Brighton",
    "Oxford", "Cambridge", "York", "Bath", "Aberdeen", "Dundee", "Swansea",
    "Milton Keynes", "Reading", "Norwich", "Exeter", "Plymouth", "Coventry",
    "Kent", "Surrey", "Essex", "Yorkshire", "Lancashire", "Cornwall", "Devon",
];

pub const LOCATIONS: &[&str] = &[
    "Thames", "Severn", "Lake District", "Peak District", "Cotswolds",
    "Highlands", "Snowdonia", "Pennines", "Dartmoor", "Exmoor", "Ben Nevis",
    "Europe", "Asia", "Africa", "North Sea", "English Channel",
];
