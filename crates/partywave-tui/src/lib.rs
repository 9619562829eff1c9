// Terminal front end for the PartyWave admin console.

pub mod tui;
