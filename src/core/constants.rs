// Controller wiring
pub const NUM_INPUTS: usize = 3;
pub const NUM_OUTPUTS: usize = 1;
pub const INPUT_NAMES: [&str; NUM_INPUTS] = ["delta_x", "delta_y_top", "delta_y_bottom"];
pub const OUTPUT_NAME: &str = "Jump or Not";

// Output files
pub const DEFAULT_OUTPUT_DIR: &str = "training_output";
pub const LOG_FILE_NAME: &str = "flappy-neuro.log";
pub const FITNESS_CSV_NAME: &str = "fitness.csv";
pub const BEST_GENOME_NAME: &str = "best_genome.json";
pub const BEST_NETWORK_NAME: &str = "best_network.dot";
pub const SUMMARY_NAME: &str = "summary.txt";

// Terminal presentation
pub const INFO_PANEL_WIDTH: u16 = 24;
pub const QUIT_POLL_MS: u64 = 1;
