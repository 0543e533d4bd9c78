use super::models::Scenario;

/// The scenarios offered when the configuration does not supply its own list.
pub fn builtin_scenarios() -> Vec<Scenario> {
    vec![
        Scenario::new("coffee", "Cafe & Ordering", "☕", "Ordering drinks, snacks, and cafe etiquette."),
        Scenario::new("travel", "Travel & Transport", "✈️", "Airports, trains, hotels, and directions."),
        Scenario::new("business", "Business Meeting", "💼", "Formal introductions, presentations, and office talk."),
        Scenario::new("shopping", "Shopping", "🛍️", "Clothes, sizes, bargaining, and payments."),
        Scenario::new("hospital", "Medical & Health", "🏥", "Symptoms, pharmacy, and doctor visits."),
        Scenario::new("restaurant", "Dining Out", "🍽️", "Reservations, menus, allergies, and bills."),
        Scenario::new("home", "Daily Life", "🏠", "Chores, furniture, family routines."),
        Scenario::new("tech", "Digital & Tech", "💻", "Internet, gadgets, troubleshooting."),
    ]
}
