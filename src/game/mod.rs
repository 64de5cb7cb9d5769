// Game logic
//
// - `characters`: the controllable samurai, its tuning and state machine
// - `combat`: attack selection, melee hit tests, enemies and power-ups
// - `events`: gameplay notifications drained by the host once per frame
// - `session`: one run of the game tying grid, player and roster together

pub mod characters;
pub mod combat;
pub mod events;
pub mod session;
