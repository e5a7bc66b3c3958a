//! Supported currencies and their display metadata

/// Reference currency every fetched table is expressed against.
pub const BASE_CURRENCY: &str = "USD";

/// Currencies the application displays and converts between, in display order.
pub const SUPPORTED_CURRENCIES: [&str; 10] = [
    "PHP", "USD", "EUR", "GBP", "JPY", "KRW", "SGD", "AUD", "CAD", "INR",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolPosition {
    Before,
    After,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurrencyInfo {
    pub code: &'static str,
    pub name: &'static str,
    pub symbol: &'static str,
    pub decimals: usize,
    pub position: SymbolPosition,
}

const CURRENCIES: [CurrencyInfo; 10] = [
    CurrencyInfo {
        code: "PHP",
        name: "Philippine Peso",
        symbol: "₱",
        decimals: 2,
        position: SymbolPosition::Before,
    },
    CurrencyInfo {
        code: "USD",
        name: "US Dollar",
        symbol: "$",
        decimals: 2,
        position: SymbolPosition::Before,
    },
    CurrencyInfo {
        code: "EUR",
        name: "Euro",
        symbol: "€",
        decimals: 2,
        position: SymbolPosition::After,
    },
    CurrencyInfo {
        code: "GBP",
        name: "British Pound",
        symbol: "£",
        decimals: 2,
        position: SymbolPosition::Before,
    },
    CurrencyInfo {
        code: "JPY",
        name: "Japanese Yen",
        symbol: "¥",
        decimals: 0,
        position: SymbolPosition::Before,
    },
    CurrencyInfo {
        code: "KRW",
        name: "South Korean Won",
        symbol: "₩",
        decimals: 0,
        position: SymbolPosition::Before,
    },
    CurrencyInfo {
        code: "SGD",
        name: "Singapore Dollar",
        symbol: "S$",
        decimals: 2,
        position: SymbolPosition::Before,
    },
    CurrencyInfo {
        code: "AUD",
        name: "Australian Dollar",
        symbol: "A$",
        decimals: 2,
        position: SymbolPosition::Before,
    },
    CurrencyInfo {
        code: "CAD",
        name: "Canadian Dollar",
        symbol: "C$",
        decimals: 2,
        position: SymbolPosition::Before,
    },
    CurrencyInfo {
        code: "INR",
        name: "Indian Rupee",
        symbol: "₹",
        decimals: 2,
        position: SymbolPosition::Before,
    },
];

/// Trims and upper-cases user supplied currency codes.
pub fn normalize_code(code: &str) -> String {
    code.trim().to_uppercase()
}

pub fn is_supported(code: &str) -> bool {
    SUPPORTED_CURRENCIES.contains(&code)
}

pub fn currency_info(code: &str) -> Option<&'static CurrencyInfo> {
    CURRENCIES.iter().find(|c| c.code == code)
}

fn group_thousands(digits: &str) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

/// Renders an amount with the currency's symbol, placement and decimal places.
///
/// Unknown codes fall back to `"{amount:.2} {code}"`.
pub fn format_amount(amount: f64, code: &str) -> String {
    let Some(info) = currency_info(code) else {
        return format!("{amount:.2} {code}");
    };

    let fixed = format!("{:.*}", info.decimals, amount.abs());
    let (int_part, frac_part) = match fixed.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (fixed.as_str(), None),
    };
    let mut number = group_thousands(int_part);
    if let Some(frac) = frac_part {
        number.push('.');
        number.push_str(frac);
    }

    // "-0" after rounding should not keep its sign
    let is_zero = fixed.chars().all(|c| c == '0' || c == '.');
    let sign = if amount < 0.0 && !is_zero { "-" } else { "" };
    match info.position {
        SymbolPosition::Before => format!("{sign}{}{number}", info.symbol),
        SymbolPosition::After => format!("{sign}{number} {}", info.symbol),
    }
}
