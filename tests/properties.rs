use std::cell::Cell;
use std::collections::HashMap;
use std::rc::Rc;

use proptest::prelude::*;
use webi18n::{
    params, Bundle, FixedLocale, I18n, Locale, MemoryDocument, MemoryStorage, TranslationTree,
};

fn builtin(host: Option<&str>) -> I18n {
    I18n::builder()
        .host_locale(FixedLocale(host.map(str::to_string)))
        .build()
        .unwrap()
}

fn requested_code() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("en".to_string()),
        Just("zh".to_string()),
        Just("fr".to_string()),
        Just("EN".to_string()),
        Just(String::new()),
        "[a-z]{2}",
    ]
}

fn absent_key() -> impl Strategy<Value = String> {
    "[a-z]{1,6}(\\.[a-z]{1,6}){0,2}".prop_map(|key| format!("zz{}", key))
}

const MARKERS: [&str; 4] = [
    "data-i18n",
    "data-i18n-title",
    "data-i18n-aria-label",
    "data-i18n-placeholder",
];

const BUILTIN_KEYS: [&str; 6] = [
    "header.title",
    "header.subtitle",
    "common.search",
    "operations.title",
    "recipe.title",
    "loading_messages",
];

proptest! {
    #[test]
    fn locale_only_changes_to_registered_codes(codes in proptest::collection::vec(requested_code(), 1..20)) {
        let i18n = builtin(None);
        let notified = Rc::new(Cell::new(0usize));
        let counter = notified.clone();
        i18n.subscribe(move |_| counter.set(counter.get() + 1));

        let mut expected = "en".to_string();
        let mut changes = 0;
        for code in &codes {
            let before = i18n.current_locale();
            let changed = i18n.set_locale(code);
            if i18n.registry().contains(code) && *code != before {
                prop_assert!(changed);
                expected = code.clone();
                changes += 1;
            } else {
                prop_assert!(!changed);
            }
            prop_assert_eq!(i18n.current_locale(), expected.clone());
        }
        prop_assert_eq!(notified.get(), changes);
    }

    #[test]
    fn absent_key_translates_to_itself(key in absent_key(), zh in any::<bool>()) {
        let i18n = builtin(zh.then_some("zh-TW"));
        prop_assert_eq!(i18n.t(&key), key.clone());
        prop_assert_eq!(i18n.t_with(&key, &params! { "name" => "Ada" }), key);
    }

    #[test]
    fn current_locale_gaps_fall_back(
        entries in proptest::collection::btree_map("[a-z]{1,6}", "[A-Za-z ]{0,12}", 1..8)
    ) {
        let mut en = TranslationTree::new();
        for (key, value) in &entries {
            en.insert(&format!("app.{}", key), value.as_str());
        }
        let mut translations = HashMap::new();
        translations.insert("en".to_string(), en);
        translations.insert("de".to_string(), TranslationTree::new());
        let bundle = Bundle {
            locales: vec![
                Locale::new("en", "English", "English"),
                Locale::new("de", "German", "Deutsch"),
            ],
            translations,
        };
        let i18n = I18n::builder()
            .bundle(bundle)
            .host_locale(FixedLocale::new("de-DE"))
            .build()
            .unwrap();

        prop_assert_eq!(i18n.current_locale(), "de");
        for (key, value) in &entries {
            prop_assert_eq!(i18n.t(&format!("app.{}", key)), value.clone());
        }
    }

    #[test]
    fn plain_text_is_untouched_by_params(text in "[^{}]{0,40}", value in "\\PC{0,10}") {
        let mut en = TranslationTree::new();
        en.insert("plain", text.as_str());
        let mut translations = HashMap::new();
        translations.insert("en".to_string(), en);
        let i18n = I18n::builder()
            .bundle(Bundle {
                locales: vec![Locale::new("en", "English", "English")],
                translations,
            })
            .host_locale(FixedLocale::none())
            .build()
            .unwrap();

        prop_assert_eq!(i18n.t_with("plain", &params! { "name" => value }), text);
    }

    #[test]
    fn page_sync_is_idempotent(
        bindings in proptest::collection::vec(
            (0..MARKERS.len(), 0..BUILTIN_KEYS.len(), any::<bool>()),
            0..12,
        ),
        zh in any::<bool>(),
    ) {
        let doc = MemoryDocument::new().into_shared();
        {
            let mut d = doc.borrow_mut();
            let body = d.body();
            for (marker, key, input) in &bindings {
                let tag = if *input { "input" } else { "span" };
                d.append_element(body, tag, &[(MARKERS[*marker], BUILTIN_KEYS[*key])]);
            }
        }
        let i18n = I18n::builder()
            .document(doc.clone())
            .preferences(MemoryStorage::new())
            .host_locale(FixedLocale(zh.then(|| "zh".to_string())))
            .build()
            .unwrap();

        prop_assert_eq!(i18n.sync_page(), bindings.len());
        let html = doc.borrow().to_html();
        let mutations = doc.borrow().mutations();

        prop_assert_eq!(i18n.sync_page(), bindings.len());
        prop_assert_eq!(doc.borrow().to_html(), html);
        prop_assert_eq!(doc.borrow().mutations(), mutations);
    }
}
