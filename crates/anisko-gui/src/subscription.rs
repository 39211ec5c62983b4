use iced::{keyboard, window, Subscription};

use crate::app::Message;

/// Window geometry changes and the global Escape key.
pub fn events() -> Subscription<Message> {
    iced::event::listen_with(|event, _status, _id| match event {
        iced::Event::Window(event @ (window::Event::Resized(_) | window::Event::Moved(_))) => {
            Some(Message::WindowEvent(event))
        }
        iced::Event::Keyboard(keyboard::Event::KeyPressed {
            key: keyboard::Key::Named(keyboard::key::Named::Escape),
            ..
        }) => Some(Message::Escape),
        _ => None,
    })
}
