#[macro_export]
macro_rules! regex {
    ($pat:literal) => {{
        static RE: once_cell::sync::Lazy<regex::Regex> =
            once_cell::sync::Lazy::new(|| regex::Regex::new($pat).unwrap());
        &*RE
    }};
}

/// Union of named [`TagSet`](crate::TagSet) flags: `tags!(PRATHAMA, EKAVACANA)`.
#[macro_export]
macro_rules! tags {
    ($($flag:ident),* $(,)?) => {
        $crate::TagSet::empty() $(| $crate::TagSet::$flag)*
    };
}

/// Declare a sandhi [`Sutra`](crate::prakriya::Sutra).
///
/// ```ignore
/// sutra! {
///     name: "akaHsavarRedIrGaH",
///     id: (6, 1, 101),
///     cond: Cond::all([Cond::in_pratyahara("ak", Var::L), Cond::savarna_var(Var::L, Var::R)]),
///     xform: Xform::new(Op::apply(Phon::Dirgha, Var::L), Op::Clear),
///     overrides: [(6, 1, 77)],
/// }
/// ```
#[macro_export]
macro_rules! sutra {
    (
        name: $name:expr,
        id: ( $($id:expr),+ $(,)? ),
        cond: $cond:expr,
        xform: $xform:expr
        $(, domain: $domain:expr)?
        $(, update: $update:expr)?
        $(, optional: $optional:expr)?
        $(, bahiranga: $bahiranga:expr)?
        $(, overrides: [ $( ( $($ov:expr),+ $(,)? ) ),* $(,)? ])?
        $(,)?
    ) => {{
        $crate::prakriya::Sutra {
            name: $name,
            id: $crate::prakriya::SutraId::from_parts(&[ $($id),+ ]),
            cond: $cond,
            xform: $xform,
            domain: {
                let _d = $crate::prakriya::Domain::STANDARD;
                $(let _d = $domain;)?
                _d
            },
            update: {
                let _u: Option<$crate::prakriya::Update> = None;
                $(let _u: Option<$crate::prakriya::Update> = Some($update);)?
                _u
            },
            optional: { false $(|| $optional)? },
            bahiranga: {
                let _b = 1u32;
                $(let _b = $bahiranga;)?
                _b
            },
            overrides: vec![ $($( $crate::prakriya::SutraId::from_parts(&[ $($ov),+ ]) ),*)? ],
        }
    }};
}
