//! Localized strings shown by the payment screen.
//!
//! Keys follow the `pay.<group>.<name>` scheme of the string catalogs the
//! host apps ship; [`localize`] resolves them against the built-in tables.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Languages the payment screen is translated into.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Language {
    /// English
    #[default]
    English,
    /// Uzbek (Latin script)
    Uzbek,
    /// Russian
    Russian,
}

impl Language {
    /// ISO 639-1 code.
    pub const fn code(&self) -> &'static str {
        match self {
            Self::English => "en",
            Self::Uzbek => "uz",
            Self::Russian => "ru",
        }
    }
}

/// Every string the payment screen displays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageKey {
    /// Label above the amount banner.
    BannerAmount,
    /// Inline error under the cardholder field.
    CardHolderError,
    /// Cardholder field placeholder.
    CardHolderPlaceholder,
    /// Cardholder field title.
    CardHolderTitle,
    /// Inline error under the card number field.
    CardNumberError,
    /// Card number field placeholder.
    CardNumberPlaceholder,
    /// Card number field title.
    CardNumberTitle,
    /// Inline error under the CVV field.
    CvvError,
    /// CVV field placeholder.
    CvvPlaceholder,
    /// CVV field title.
    CvvTitle,
    /// Body of the generic error alert.
    DefaultErrorDescription,
    /// Title of the generic error alert.
    DefaultErrorTitle,
    /// Inline error under the expiration date field.
    ExpirationDateError,
    /// Expiration date field title.
    ExpirationDateTitle,
    /// Footer caption.
    FooterTitle,
    /// Close button in the navigation header.
    NavigationCloseButton,
    /// Navigation header title.
    NavigationTitle,
    /// Submit button.
    NextButton,
}

impl MessageKey {
    /// Catalog key, e.g. `pay.cardNumber.errorMessage`.
    pub const fn key(&self) -> &'static str {
        match self {
            Self::BannerAmount => "pay.banner.amount",
            Self::CardHolderError => "pay.cardHolder.errorMessage",
            Self::CardHolderPlaceholder => "pay.cardHolder.placeholder",
            Self::CardHolderTitle => "pay.cardHolder.title",
            Self::CardNumberError => "pay.cardNumber.errorMessage",
            Self::CardNumberPlaceholder => "pay.cardNumber.placeholder",
            Self::CardNumberTitle => "pay.cardNumber.title",
            Self::CvvError => "pay.cvv.errorMessage",
            Self::CvvPlaceholder => "pay.cvv.placeholder",
            Self::CvvTitle => "pay.cvv.title",
            Self::DefaultErrorDescription => "pay.error.default.description",
            Self::DefaultErrorTitle => "pay.error.default.title",
            Self::ExpirationDateError => "pay.expirationDate.errorMessage",
            Self::ExpirationDateTitle => "pay.expirationDate.title",
            Self::FooterTitle => "pay.footer.title",
            Self::NavigationCloseButton => "pay.navigationHeader.closeButtonTitle",
            Self::NavigationTitle => "pay.navigationHeader.title",
            Self::NextButton => "pay.nextButtonTitle",
        }
    }
}

impl fmt::Display for MessageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Resolves a message in the given language.
///
/// # Example
///
/// ```
/// use payze::localization::{localize, Language, MessageKey};
///
/// assert_eq!(localize(MessageKey::NextButton, Language::English), "Pay");
/// assert_eq!(localize(MessageKey::NextButton, Language::Russian), "Оплатить");
/// ```
pub fn localize(key: MessageKey, language: Language) -> &'static str {
    use Language::*;
    use MessageKey::*;

    match (key, language) {
        (BannerAmount, English) => "Amount",
        (BannerAmount, Uzbek) => "Summa",
        (BannerAmount, Russian) => "Сумма",

        (CardHolderError, English) => "Enter the cardholder name",
        (CardHolderError, Uzbek) => "Karta egasining ismini kiriting",
        (CardHolderError, Russian) => "Введите имя владельца карты",

        (CardHolderPlaceholder, English) => "Name on card",
        (CardHolderPlaceholder, Uzbek) => "Kartadagi ism",
        (CardHolderPlaceholder, Russian) => "Имя на карте",

        (CardHolderTitle, English) => "Cardholder",
        (CardHolderTitle, Uzbek) => "Karta egasi",
        (CardHolderTitle, Russian) => "Владелец карты",

        (CardNumberError, English) => "Invalid card number",
        (CardNumberError, Uzbek) => "Karta raqami noto'g'ri",
        (CardNumberError, Russian) => "Неверный номер карты",

        (CardNumberPlaceholder, _) => "0000 0000 0000 0000",

        (CardNumberTitle, English) => "Card number",
        (CardNumberTitle, Uzbek) => "Karta raqami",
        (CardNumberTitle, Russian) => "Номер карты",

        (CvvError, English) => "Invalid CVV",
        (CvvError, Uzbek) => "CVV noto'g'ri",
        (CvvError, Russian) => "Неверный CVV",

        (CvvPlaceholder, _) => "000",
        (CvvTitle, _) => "CVV",

        (DefaultErrorDescription, English) => "Something went wrong. Please try again.",
        (DefaultErrorDescription, Uzbek) => "Xatolik yuz berdi. Qaytadan urinib ko'ring.",
        (DefaultErrorDescription, Russian) => "Что-то пошло не так. Попробуйте ещё раз.",

        (DefaultErrorTitle, English) => "Error",
        (DefaultErrorTitle, Uzbek) => "Xatolik",
        (DefaultErrorTitle, Russian) => "Ошибка",

        (ExpirationDateError, English) => "Invalid expiration date",
        (ExpirationDateError, Uzbek) => "Amal qilish muddati noto'g'ri",
        (ExpirationDateError, Russian) => "Неверный срок действия",

        (ExpirationDateTitle, English) => "Expiration date",
        (ExpirationDateTitle, Uzbek) => "Amal qilish muddati",
        (ExpirationDateTitle, Russian) => "Срок действия",

        (FooterTitle, English) => "Secured by Payze",
        (FooterTitle, Uzbek) => "Payze tomonidan himoyalangan",
        (FooterTitle, Russian) => "Защищено Payze",

        (NavigationCloseButton, English) => "Close",
        (NavigationCloseButton, Uzbek) => "Yopish",
        (NavigationCloseButton, Russian) => "Закрыть",

        (NavigationTitle, English) => "Payment",
        (NavigationTitle, Uzbek) => "To'lov",
        (NavigationTitle, Russian) => "Оплата",

        (NextButton, English) => "Pay",
        (NextButton, Uzbek) => "To'lash",
        (NextButton, Russian) => "Оплатить",
    }
}
