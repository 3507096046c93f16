use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink, Source, source::Buffered};
use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;

const SOUND_PATH: &str = "assets/sounds";

/// Named sound triggers emitted by the game core
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoundEvent {
    Shoot,
    InvaderKilled,
    MysteryKilled,
    MysteryEntered,
    ShipExplosion,
}

impl SoundEvent {
    pub const ALL: [SoundEvent; 5] = [
        SoundEvent::Shoot,
        SoundEvent::InvaderKilled,
        SoundEvent::MysteryKilled,
        SoundEvent::MysteryEntered,
        SoundEvent::ShipExplosion,
    ];

    pub fn get_name(&self) -> &'static str {
        match self {
            SoundEvent::Shoot => "shoot",
            SoundEvent::InvaderKilled => "invaderkilled",
            SoundEvent::MysteryKilled => "mysterykilled",
            SoundEvent::MysteryEntered => "mysteryentered",
            SoundEvent::ShipExplosion => "shipexplosion",
        }
    }

    fn volume(&self) -> f32 {
        match self {
            SoundEvent::MysteryEntered => 0.3,
            _ => 0.2,
        }
    }
}

type Sound = Buffered<Decoder<BufReader<File>>>;

/// Audio manager for playing sound effects
pub struct AudioManager {
    /// Keeps the output device open; `None` when running without audio
    output: Option<(OutputStream, OutputStreamHandle)>,
    /// Pre-loaded and buffered effects; missing files are simply absent
    sounds: HashMap<SoundEvent, Sound>,
}

impl AudioManager {
    /// Open the default output device and pre-load every effect
    pub fn new() -> Result<Self, Box<dyn std::error::Error>> {
        let (stream, stream_handle) = OutputStream::try_default()?;

        let mut sounds = HashMap::new();
        for event in SoundEvent::ALL {
            match load_sound(event) {
                Ok(sound) => {
                    sounds.insert(event, sound);
                }
                Err(err) => {
                    tracing::warn!(sound = event.get_name(), %err, "failed to load sound");
                }
            }
        }

        Ok(Self {
            output: Some((stream, stream_handle)),
            sounds,
        })
    }

    /// An audio manager that plays nothing
    pub fn silent() -> Self {
        Self {
            output: None,
            sounds: HashMap::new(),
        }
    }

    pub fn play(&self, event: SoundEvent) {
        let (Some((_, stream_handle)), Some(sound)) = (&self.output, self.sounds.get(&event))
        else {
            return;
        };
        // Ignore errors for sound playback - don't want to crash the game
        if let Ok(sink) = Sink::try_new(stream_handle) {
            sink.set_volume(event.volume());
            // Clone the buffered source (fast - just clones references)
            sink.append(sound.clone());
            sink.detach();
        }
    }
}

impl Default for AudioManager {
    fn default() -> Self {
        Self::new().unwrap_or_else(|err| {
            tracing::warn!(%err, "failed to initialize audio, continuing without sound");
            Self::silent()
        })
    }
}

fn load_sound(event: SoundEvent) -> Result<Sound, Box<dyn std::error::Error>> {
    let file = File::open(format!("{}/{}.wav", SOUND_PATH, event.get_name()))?;
    let source = Decoder::new(BufReader::new(file))?;
    Ok(source.buffered())
}
