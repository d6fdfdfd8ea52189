use lottery_models::ModelRegistry;
use lottery_strategy::StrategyKind;

pub fn list_strategies() {
    println!("{:<22} {:<12} DESCRIPTION", "STRATEGY", "RISK");
    for kind in StrategyKind::ALL {
        let risk = format!("{:?}", kind.risk_level()).to_lowercase();
        println!("{:<22} {:<12} {}", kind.as_str(), risk, kind.description());
    }
}

pub fn list_models() {
    for name in ModelRegistry::with_defaults().names() {
        println!("{name}");
    }
}
