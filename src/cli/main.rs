use structopt::StructOpt;
use matgen::command::{self, MatGen};

fn main() -> anyhow::Result<()> {
    env_logger::init();
    command::run(MatGen::from_args())
}
