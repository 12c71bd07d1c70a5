use super::dictionary::{CategoryKeywords, CorrectionDictionary, UnitRule};
use std::collections::{BTreeMap, BTreeSet};

pub const DEFAULT_CATEGORY: &str = "Основные параметры";

fn words(list: &[&str]) -> Vec<String> {
    list.iter().map(|w| w.to_string()).collect()
}

impl CorrectionDictionary {
    /// Built-in tables for Russian heavy-equipment listings.
    pub fn builtin() -> Self {
        let mut ocr_corrections = BTreeMap::new();
        // Latin/Cyrillic look-alikes and case slips in unit tokens.
        // Keys are lowercase; several contain Latin letters on purpose.
        for (wrong, right) in [
            ("kbт", "кВт"),
            ("kвт", "кВт"),
            ("квt", "кВт"),
            ("квт", "кВт"),
            ("kw", "кВт"),
            ("kг", "кг"),
            ("kм/ч", "км/ч"),
            ("км/час", "км/ч"),
            ("mпa", "МПа"),
            ("mпа", "МПа"),
            ("мпa", "МПа"),
            ("мпа", "МПа"),
            ("o6/мин", "об/мин"),
            ("06/мин", "об/мин"),
            ("об./мин", "об/мин"),
            ("об/мин.", "об/мин"),
            ("hм", "Нм"),
            ("h*м", "Нм"),
            ("н*м", "Нм"),
            ("н.м", "Нм"),
            ("нм", "Нм"),
            ("kh", "кН"),
            ("kн", "кН"),
            ("кн", "кН"),
            ("л.c.", "л.с."),
            ("лс", "л.с."),
            ("cм", "см"),
            ("mм", "мм"),
            ("m3", "м³"),
            ("м3", "м³"),
            ("куб.м", "м³"),
            ("m2", "м²"),
            ("м2", "м²"),
        ] {
            ocr_corrections.insert(wrong.to_string(), right.to_string());
        }

        let categories = vec![
            CategoryKeywords {
                name: "Двигатель".to_string(),
                keywords: words(&["двигател", "мотор", "engine"]),
                key_hints: words(&[
                    "мощность",
                    "крутящий момент",
                    "двигател",
                    "расход топлива",
                    "цилиндр",
                    "экологический класс",
                ]),
            },
            CategoryKeywords {
                name: "Трансмиссия".to_string(),
                keywords: words(&["трансмисси", "коробка передач", "кпп", "transmission"]),
                key_hints: words(&["передач", "кпп", "трансмисс", "коробк", "сцеплени"]),
            },
            CategoryKeywords {
                name: "Гидравлика".to_string(),
                keywords: words(&["гидравли", "гидросистем", "hydraulic"]),
                key_hints: words(&["гидро", "насос", "давлени"]),
            },
            CategoryKeywords {
                name: "Ходовая часть".to_string(),
                keywords: words(&[
                    "ходовая",
                    "ходовое оборудование",
                    "шасси",
                    "гусеничн",
                    "chassis",
                    "undercarriage",
                ]),
                key_hints: words(&[
                    "гусениц",
                    "колея",
                    "клиренс",
                    "дорожный просвет",
                    "колесная формула",
                    "башмак",
                ]),
            },
            CategoryKeywords {
                name: "Подвеска".to_string(),
                keywords: words(&["подвеск", "suspension"]),
                key_hints: words(&["подвеск", "рессор", "амортизатор"]),
            },
            CategoryKeywords {
                name: "Крановое оборудование".to_string(),
                keywords: words(&["кранов", "crane"]),
                key_hints: words(&["вылет", "стрел", "высота подъема", "крюк"]),
            },
            CategoryKeywords {
                name: "Рабочие характеристики".to_string(),
                keywords: words(&[
                    "рабочие характеристики",
                    "рабочие параметры",
                    "эксплуатационные характеристики",
                    "технические характеристики",
                    "производительность",
                    "performance",
                ]),
                key_hints: words(&[
                    "скорость поворота",
                    "усилие",
                    "глубина копания",
                    "радиус копания",
                    "высота выгрузки",
                    "производительность",
                    "объем ковша",
                    "скорость передвижения",
                ]),
            },
            CategoryKeywords {
                name: "Габариты".to_string(),
                keywords: words(&["габарит", "размеры", "dimensions"]),
                key_hints: words(&["длина", "ширина", "высота", "размер", "габарит", "база"]),
            },
            CategoryKeywords {
                name: "Вес".to_string(),
                keywords: words(&["весовые", "масса", "weight"]),
                key_hints: words(&["масса", "снаряженн"]),
            },
        ];

        let mut key_corrections = BTreeMap::new();
        for (wrong, right) in [
            ("мошность", "мощность"),
            ("мощьность", "мощность"),
            ("обьем", "объем"),
            ("обьём", "объём"),
            ("подьем", "подъем"),
            ("подьём", "подъём"),
            ("кол-во", "количество"),
            ("к-во", "количество"),
            ("макс.", "максимальная"),
            ("двиг.", "двигателя"),
            ("крутяший", "крутящий"),
        ] {
            key_corrections.insert(wrong.to_string(), right.to_string());
        }

        let excluded_key_fragments: BTreeSet<String> = [
            "цена",
            "стоимость",
            "цвет",
            "страна",
            "описание",
            "год",
            "гарантия",
            "наличие",
            "доставка",
            "телефон",
            "price",
            "color",
            "country",
            "description",
            "year",
        ]
        .iter()
        .map(|f| f.to_string())
        .collect();

        let units = words(&[
            "мм", "см", "м", "км", "кг", "т", "л", "мл", "м³", "м²", "кВт", "Вт", "кВА", "л.с.",
            "об/мин", "км/ч", "м/с", "МПа", "кПа", "Па", "бар", "атм", "кН", "Н", "Нм", "Н·м",
            "кгс", "°", "°C", "град", "%", "мин", "л/мин", "л/ч", "г/кВт·ч", "дБ", "шт", "mm",
            "cm", "kg", "kW", "hp", "rpm", "MPa", "bar", "km/h",
        ]);

        let unit_rules = vec![
            UnitRule {
                unit: "°".to_string(),
                keywords: words(&["угол"]),
            },
            UnitRule {
                unit: "об/мин".to_string(),
                keywords: words(&["поворот", "вращени", "оборот"]),
            },
            UnitRule {
                unit: "л.с.".to_string(),
                keywords: words(&["л.с", "лошадин", "hp"]),
            },
            UnitRule {
                unit: "кВт".to_string(),
                keywords: words(&["мощност", "power"]),
            },
            UnitRule {
                unit: "Нм".to_string(),
                keywords: words(&["момент"]),
            },
            UnitRule {
                unit: "м³".to_string(),
                keywords: words(&["объем ковша", "вместимость ковша", "емкость ковша"]),
            },
            UnitRule {
                unit: "км/ч".to_string(),
                keywords: words(&["скорост", "speed"]),
            },
            UnitRule {
                unit: "МПа".to_string(),
                keywords: words(&["давлени", "pressure"]),
            },
            UnitRule {
                unit: "кг".to_string(),
                keywords: words(&["вес", "масса", "нагрузк", "грузоподъемн", "weight"]),
            },
            UnitRule {
                unit: "л".to_string(),
                keywords: words(&["объем", "объём", "емкость", "ёмкость", "бак", "вместимость"]),
            },
            UnitRule {
                unit: "мм".to_string(),
                keywords: words(&[
                    "длина", "ширина", "высота", "габарит", "размер", "база", "колея", "клиренс",
                    "просвет", "вылет", "радиус", "глубина",
                ]),
            },
        ];

        CorrectionDictionary {
            default_category: DEFAULT_CATEGORY.to_string(),
            ocr_corrections,
            categories,
            key_corrections,
            excluded_key_fragments,
            units,
            unit_rules,
        }
    }
}
