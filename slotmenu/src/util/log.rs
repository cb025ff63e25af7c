/// Provides the recommended log filter for programs which embed `slotmenu` and want to
/// exclude particularly noisy details.
///
/// The guiding principle for this filtering is that at [`log::Level::Debug`] or lower level,
/// there should be no messages produced every tick unless something is wrong.
/// (Per-frame application is logged at [`log::Level::Trace`].)
pub fn standard_filter(metadata: &log::Metadata<'_>) -> bool {
    let target = metadata.target();

    !(target.starts_with("tracing::span") // logs every single tracing span
        || target.starts_with("mio::")) // noisy when the tokio tick provider is in use
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filter() {
        assert!(!standard_filter(
            &log::Metadata::builder().target("tracing::span::active").build()
        ));
        assert!(standard_filter(
            &log::Metadata::builder()
                .target("slotmenu::runner")
                .level(log::Level::Debug)
                .build()
        ));
        assert!(standard_filter(
            &log::Metadata::builder().target("some_random_crate").build()
        ));
    }
}
