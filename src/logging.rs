/// Initialize the logger with the specified verbosity level
///
/// # Arguments
/// * `verbose` - Verbosity level (0=warn, 1=info, 2=debug, 3+=trace)
pub fn setup_logger(verbose: u8) {
    let env_filter = filter_for(verbose);

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(env_filter))
        .format_timestamp(None)
        .format_module_path(false)
        .format_target(false)
        .init();
}

fn filter_for(verbose: u8) -> &'static str {
    match verbose {
        0 => "tlb_kiosk=warn",
        1 => "tlb_kiosk=info",
        2 => "tlb_kiosk=debug",
        _ => "tlb_kiosk=trace",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbosity_maps_to_filters() {
        assert_eq!(filter_for(0), "tlb_kiosk=warn");
        assert_eq!(filter_for(1), "tlb_kiosk=info");
        assert_eq!(filter_for(2), "tlb_kiosk=debug");
        assert_eq!(filter_for(9), "tlb_kiosk=trace");
    }
}
