//! Localised validation messages.
//!
//! Templates may contain a `{n}` placeholder that is filled with the bound
//! that was violated.

use crate::locale::Locale;

#[derive(Debug)]
pub struct MessageSet {
    pub required: &'static str,
    pub too_short: &'static str,
    pub too_long: &'static str,
    pub invalid_name: &'static str,
    pub invalid_email: &'static str,
    pub invalid_phone: &'static str,
    pub not_a_number: &'static str,
    pub must_be_positive: &'static str,
    pub quantity_too_large: &'static str,
    pub too_few_products: &'static str,
    pub too_many_products: &'static str,
    pub invalid_choice: &'static str,
    pub expected_object: &'static str,
    pub expected_array: &'static str,
    pub expected_text: &'static str,
}

impl MessageSet {
    /// Fills the `{n}` placeholder of a template.
    pub fn with_bound(template: &str, n: impl std::fmt::Display) -> String {
        template.replace("{n}", &n.to_string())
    }
}

static EN: MessageSet = MessageSet {
    required: "This field is required",
    too_short: "Must be at least {n} characters",
    too_long: "Must be at most {n} characters",
    invalid_name: "Name may only contain letters, spaces, hyphens and apostrophes",
    invalid_email: "Invalid email address",
    invalid_phone: "Invalid phone number",
    not_a_number: "Must be a number",
    must_be_positive: "Quantity must be positive",
    quantity_too_large: "Quantity must not exceed {n}",
    too_few_products: "Select at least one product",
    too_many_products: "At most {n} products per request",
    invalid_choice: "Invalid option",
    expected_object: "Expected an object",
    expected_array: "Expected a list",
    expected_text: "Expected text",
};

static FR: MessageSet = MessageSet {
    required: "Ce champ est obligatoire",
    too_short: "Doit contenir au moins {n} caractères",
    too_long: "Doit contenir au plus {n} caractères",
    invalid_name: "Le nom ne peut contenir que des lettres, espaces, tirets et apostrophes",
    invalid_email: "Adresse e-mail invalide",
    invalid_phone: "Numéro de téléphone invalide",
    not_a_number: "Doit être un nombre",
    must_be_positive: "La quantité doit être positive",
    quantity_too_large: "La quantité ne peut pas dépasser {n}",
    too_few_products: "Sélectionnez au moins un produit",
    too_many_products: "{n} produits maximum par demande",
    invalid_choice: "Option invalide",
    expected_object: "Objet attendu",
    expected_array: "Liste attendue",
    expected_text: "Texte attendu",
};

static ES: MessageSet = MessageSet {
    required: "Este campo es obligatorio",
    too_short: "Debe tener al menos {n} caracteres",
    too_long: "Debe tener como máximo {n} caracteres",
    invalid_name: "El nombre solo puede contener letras, espacios, guiones y apóstrofos",
    invalid_email: "Correo electrónico no válido",
    invalid_phone: "Número de teléfono no válido",
    not_a_number: "Debe ser un número",
    must_be_positive: "La cantidad debe ser positiva",
    quantity_too_large: "La cantidad no puede superar {n}",
    too_few_products: "Seleccione al menos un producto",
    too_many_products: "Máximo {n} productos por solicitud",
    invalid_choice: "Opción no válida",
    expected_object: "Se esperaba un objeto",
    expected_array: "Se esperaba una lista",
    expected_text: "Se esperaba texto",
};

static DE: MessageSet = MessageSet {
    required: "Dieses Feld ist erforderlich",
    too_short: "Mindestens {n} Zeichen erforderlich",
    too_long: "Höchstens {n} Zeichen erlaubt",
    invalid_name: "Der Name darf nur Buchstaben, Leerzeichen, Bindestriche und Apostrophe enthalten",
    invalid_email: "Ungültige E-Mail-Adresse",
    invalid_phone: "Ungültige Telefonnummer",
    not_a_number: "Muss eine Zahl sein",
    must_be_positive: "Die Menge muss positiv sein",
    quantity_too_large: "Die Menge darf {n} nicht überschreiten",
    too_few_products: "Wählen Sie mindestens ein Produkt",
    too_many_products: "Höchstens {n} Produkte pro Anfrage",
    invalid_choice: "Ungültige Auswahl",
    expected_object: "Objekt erwartet",
    expected_array: "Liste erwartet",
    expected_text: "Text erwartet",
};

static RU: MessageSet = MessageSet {
    required: "Обязательное поле",
    too_short: "Минимум {n} символов",
    too_long: "Максимум {n} символов",
    invalid_name: "Имя может содержать только буквы, пробелы, дефисы и апострофы",
    invalid_email: "Неверный адрес электронной почты",
    invalid_phone: "Неверный номер телефона",
    not_a_number: "Должно быть числом",
    must_be_positive: "Количество должно быть положительным",
    quantity_too_large: "Количество не может превышать {n}",
    too_few_products: "Выберите хотя бы один продукт",
    too_many_products: "Не более {n} продуктов в запросе",
    invalid_choice: "Недопустимый вариант",
    expected_object: "Ожидается объект",
    expected_array: "Ожидается список",
    expected_text: "Ожидается текст",
};

/// Returns the message table for `locale`.
pub fn messages(locale: Locale) -> &'static MessageSet {
    match locale {
        Locale::Fr => &FR,
        Locale::En => &EN,
        Locale::Es => &ES,
        Locale::De => &DE,
        Locale::Ru => &RU,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bound_placeholder_is_filled() {
        let msg = MessageSet::with_bound(messages(Locale::En).too_short, 2);
        assert_eq!(msg, "Must be at least 2 characters");
    }

    #[test]
    fn every_locale_has_its_own_table() {
        assert_eq!(messages(Locale::Fr).required, "Ce champ est obligatoire");
        assert_eq!(messages(Locale::En).required, "This field is required");
        assert_ne!(messages(Locale::De).required, messages(Locale::En).required);
    }
}
